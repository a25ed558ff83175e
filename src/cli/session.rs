//! Interactive line session driving an edit controller

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, CommitOutcome, EditController};
use crate::cli::commands::{find_node, label_renderer};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::domain::{NodeId, Payload, TreeRecord};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::editor::PromptEditor;
use crate::infrastructure::store::to_json;
use crate::infrastructure::InfraError;

const HELP: &str = "\
commands:
  add [PARENT]           add a child (prompts for id and fields), root if PARENT omitted
  drop TARGET JSON       drop a payload onto TARGET (`null` is the root)
  enter | leave          drag into / out of the tree
  show                   print the tree
  export                 print the nested-array JSON
  save                   write the tree file
  help                   this text
  quit                   leave the session";

fn say(out: &mut impl Write, text: impl std::fmt::Display) -> CliResult<()> {
    writeln!(out, "{}", text).map_err(|e| InfraError::io("write session output", e))?;
    Ok(())
}

/// Session on stdin/stdout; `save` writes to `path`.
pub fn start_session(container: &ServiceContainer, path: &Path) -> CliResult<()> {
    let tree = container.store.load_or_new::<Payload>(path)?;
    let input = Rc::new(RefCell::new(io::stdin().lock()));

    let store = container.store.clone();
    let save_path = path.to_path_buf();
    let pretty = container.settings.pretty;
    let on_save = move |records: Vec<TreeRecord<Payload>>| match store.save(&save_path, &records, pretty) {
        Ok(()) => output::success(&format!("saved {}", save_path.display())),
        Err(e) => output::error(&e),
    };

    let mut controller = EditController::new(tree, PromptEditor::new(Rc::clone(&input), io::stdout()), on_save)
        .with_label_renderer(label_renderer(container.settings.label_field.clone()))
        .with_error_handler(|e: &ApplicationError| output::error(e));

    run_session(&mut controller, &input, &mut io::stdout(), container.settings.pretty)
}

/// Reads commands until `quit` or end of input.
#[instrument(level = "debug", skip_all)]
pub fn run_session<R: BufRead>(
    controller: &mut EditController<Payload>,
    input: &Rc<RefCell<R>>,
    out: &mut impl Write,
    pretty: bool,
) -> CliResult<()> {
    say(out, HELP)?;
    loop {
        write!(out, "> ")
            .and_then(|_| out.flush())
            .map_err(|e| InfraError::io("write session output", e))?;

        let mut line = String::new();
        let read = input
            .borrow_mut()
            .read_line(&mut line)
            .map_err(|e| InfraError::io("read session input", e))?;
        if read == 0 {
            break;
        }

        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        debug!("session command: {}", command);

        match command {
            "" => continue,
            "add" => {
                let parent = if rest.is_empty() {
                    NodeId::Null
                } else {
                    NodeId::from_input(rest)
                };
                let parent = match find_node(controller.tree(), &parent) {
                    Ok(parent) => parent,
                    Err(e) => {
                        say(out, e)?;
                        continue;
                    }
                };
                match controller.open_editor(parent)? {
                    CommitOutcome::Committed => say(out, "added")?,
                    CommitOutcome::Rejected => say(out, "not added")?,
                    CommitOutcome::Cancelled => say(out, "cancelled")?,
                }
            }
            "drop" => {
                let Some((target, payload)) = rest.split_once(' ') else {
                    say(out, "usage: drop TARGET JSON")?;
                    continue;
                };
                let target = match find_node(controller.tree(), &NodeId::from_input(target)) {
                    Ok(target) => target,
                    Err(e) => {
                        say(out, e)?;
                        continue;
                    }
                };
                match controller.drop_json(target, payload.trim()) {
                    Ok(CommitOutcome::Committed) => say(out, "dropped")?,
                    Ok(_) => say(out, "not dropped")?,
                    Err(e) => output::error(&e),
                }
            }
            "enter" => controller.drag_enter(),
            "leave" => controller.drag_leave(),
            "show" => say(out, controller.render())?,
            "export" => say(out, to_json(&controller.tree().to_array(), pretty)?)?,
            "save" => controller.save(),
            "help" => say(out, HELP)?,
            "quit" | "exit" => break,
            other => say(out, format!("unknown command: {}", other))?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tree;
    use std::io::Cursor;

    fn run(script: &str, tree: Tree) -> (Tree, String) {
        let input = Rc::new(RefCell::new(Cursor::new(script.as_bytes().to_vec())));
        let mut controller = EditController::new(tree, PromptEditor::new(Rc::clone(&input), io::sink()), |_| {})
            .with_error_handler(|_: &ApplicationError| {});
        let mut out = Vec::new();

        run_session(&mut controller, &input, &mut out, false).unwrap();
        (controller.into_tree(), String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_add_reads_editor_fields_from_same_input() {
        let (tree, out) = run("add\n1\nname=beds\n\nadd 1\n4\n\nquit\n", Tree::new());

        assert!(out.contains("added"));
        let exported = serde_json::to_string(&tree.to_array()).unwrap();
        assert_eq!(
            exported,
            r#"[{"id":1,"name":"beds","children":[{"id":4,"children":[]}]}]"#
        );
    }

    #[test]
    fn test_duplicate_add_is_reported_and_session_continues() {
        let (tree, out) = run("add\n1\n\nadd\n1\n\nshow\n", Tree::new());

        assert!(out.contains("not added"));
        assert!(out.contains("root"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_drop_and_drag_events() {
        let (tree, out) = run(
            "enter\nshow\ndrop null {\"id\": 3, \"name\": \"toys\"}\ndrop null nonsense\ndrop 42 {}\n",
            Tree::new(),
        );

        assert!(out.contains("DROP HERE"));
        assert!(out.contains("dropped"));
        assert!(out.contains("no node with id 42"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_unknown_command_and_eof() {
        let (_, out) = run("frobnicate\n", Tree::new());
        assert!(out.contains("unknown command: frobnicate"));
    }
}
