//! Line-based editor form reading from a shared input

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, EditorOutcome, IoResultExt, NodeEditor};
use crate::domain::{NodeId, Payload, Record, TreeNode};

/// Keys owned by the tree structure; never accepted as payload fields.
pub const RESERVED_KEYS: [&str; 2] = ["id", "children"];

/// Split `key=value`; the value is read as JSON when it parses, as a string otherwise.
///
/// Empty and reserved keys yield `None`.
pub fn parse_field(field: &str) -> Option<(String, Value)> {
    let (key, value) = field.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || RESERVED_KEYS.contains(&key) {
        return None;
    }
    let value = value.trim();
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Some((key.to_string(), value))
}

/// Prompts for an id and `key=value` fields.
///
/// An empty id or end of input cancels. The input is shared with the
/// surrounding session so both read from one buffer.
pub struct PromptEditor<R, W> {
    input: Rc<RefCell<R>>,
    output: W,
}

impl<R: BufRead, W: Write> PromptEditor<R, W> {
    pub fn new(input: Rc<RefCell<R>>, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, text: &str) -> ApplicationResult<Option<String>> {
        write!(self.output, "{}", text).with_context("write prompt")?;
        self.output.flush().with_context("flush prompt")?;
        let mut line = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut line)
            .with_context("read editor input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> NodeEditor<Payload> for PromptEditor<R, W> {
    #[instrument(level = "debug", skip(self, parent), fields(parent = %parent.id()))]
    fn edit(&mut self, parent: &TreeNode<Payload>) -> ApplicationResult<EditorOutcome<Payload>> {
        writeln!(self.output, "new child of {}", parent.id()).with_context("write prompt")?;

        let id = match self.prompt("id: ")? {
            Some(id) if !id.is_empty() => NodeId::from_input(&id),
            _ => {
                debug!("editor cancelled");
                return Ok(EditorOutcome::Cancel);
            }
        };

        let mut data = Payload::new();
        while let Some(line) = self.prompt("field (key=value, empty to finish): ")? {
            if line.is_empty() {
                break;
            }
            match parse_field(&line) {
                Some((key, value)) => {
                    data.insert(key, value);
                }
                None => writeln!(self.output, "ignored: {}", line).with_context("write prompt")?,
            }
        }

        Ok(EditorOutcome::Commit(Record::new(id, data)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tree;
    use serde_json::json;
    use std::io::{self, Cursor};

    fn editor(input: &str) -> PromptEditor<Cursor<Vec<u8>>, io::Sink> {
        PromptEditor::new(Rc::new(RefCell::new(Cursor::new(input.as_bytes().to_vec()))), io::sink())
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("name=beds"), Some(("name".into(), json!("beds"))));
        assert_eq!(parse_field("count = 3"), Some(("count".into(), json!(3))));
        assert_eq!(parse_field("flag=true"), Some(("flag".into(), json!(true))));
        assert_eq!(parse_field("empty="), Some(("empty".into(), json!(""))));
        assert_eq!(parse_field("novalue"), None);
        assert_eq!(parse_field("=x"), None);
        assert_eq!(parse_field("id=3"), None);
        assert_eq!(parse_field(" children = []"), None);
    }

    #[test]
    fn test_commit_with_fields() {
        let tree: Tree = Tree::new();
        let root = tree.node(tree.root()).unwrap();

        let outcome = editor("5\nname=kukane\nbogus\n\n").edit(root).unwrap();

        let mut data = Payload::new();
        data.insert("name".into(), json!("kukane"));
        assert_eq!(outcome, EditorOutcome::Commit(Record::new(5, data)));
    }

    #[test]
    fn test_structural_fields_are_ignored() {
        let tree: Tree = Tree::new();
        let root = tree.node(tree.root()).unwrap();

        let outcome = editor("5\nid=6\nchildren=[{\"id\":7}]\nname=beds\n\n").edit(root).unwrap();

        let mut data = Payload::new();
        data.insert("name".into(), json!("beds"));
        assert_eq!(outcome, EditorOutcome::Commit(Record::new(5, data)));
    }

    #[test]
    fn test_fields_end_at_eof() {
        let tree: Tree = Tree::new();
        let root = tree.node(tree.root()).unwrap();

        let outcome = editor("toys\nname=toys").edit(root).unwrap();
        match outcome {
            EditorOutcome::Commit(record) => {
                assert_eq!(record.id, NodeId::from("toys"));
                assert_eq!(record.data["name"], json!("toys"));
            }
            EditorOutcome::Cancel => panic!("expected commit"),
        }
    }

    #[test]
    fn test_empty_id_or_eof_cancels() {
        let tree: Tree = Tree::new();
        let root = tree.node(tree.root()).unwrap();

        assert_eq!(editor("\n").edit(root).unwrap(), EditorOutcome::Cancel);
        assert_eq!(editor("").edit(root).unwrap(), EditorOutcome::Cancel);
    }
}
