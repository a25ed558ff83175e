//! Command dispatch

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{render_tree, ApplicationResult, EditController, EditorOutcome};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, session};
use crate::config::Settings;
use crate::domain::{NodeId, NodeRef, Payload, Record, Tree, TreeNode, TreeRecord};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::editor::parse_field;
use crate::infrastructure::store::to_json;
use crate::infrastructure::InfraError;
use crate::util::path::PathExt;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "tree-builder", &mut io::stdout());
            Ok(())
        }
        Some(command) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let container = ServiceContainer::new(settings);
            dispatch(&container, command)
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into()),
    }
}

fn dispatch(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Show { file } => cmd_show(container, &resolve_file(container, file.as_deref())?),
        Commands::Export { file } => cmd_export(container, &resolve_file(container, file.as_deref())?),
        Commands::Add {
            file,
            parent,
            id,
            fields,
            write,
        } => cmd_add(
            container,
            &resolve_file(container, file.as_deref())?,
            parent,
            id,
            fields,
            *write,
        ),
        Commands::Drop {
            file,
            target,
            payload,
            write,
        } => cmd_drop(
            container,
            &resolve_file(container, file.as_deref())?,
            target,
            payload,
            *write,
        ),
        Commands::Session { file } => {
            session::start_session(container, &resolve_file(container, file.as_deref())?)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("{}", container.settings.to_toml()?);
                Ok(())
            }
            ConfigCommands::Template => {
                println!("{}", Settings::template());
                Ok(())
            }
        },
        Commands::Completion { .. } => Ok(()),
    }
}

/// Explicit file argument, else the configured default file.
fn resolve_file(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(|f| f.expanded())
        .or_else(|| container.settings.default_file.clone())
        .ok_or_else(|| CliError::Usage("no tree file given and no default_file configured".into()))
}

/// Labels nodes as `<field> (<id>)`, falling back to the id.
pub fn label_renderer(field: String) -> impl Fn(&TreeNode<Payload>) -> String + 'static {
    move |node: &TreeNode<Payload>| {
        if node.is_root() {
            return "root".to_string();
        }
        match node.data().and_then(|data| data.get(&field)) {
            Some(Value::String(label)) => format!("{} ({})", label, node.id()),
            Some(Value::Null) | None => node.id().to_string(),
            Some(other) => format!("{} ({})", other, node.id()),
        }
    }
}

pub(crate) fn find_node(tree: &Tree<Payload>, id: &NodeId) -> CliResult<NodeRef> {
    tree.find(id)
        .ok_or_else(|| CliError::InvalidArgs(format!("no node with id {}", id)))
}

type SavedRecords = Rc<RefCell<Option<Vec<TreeRecord<Payload>>>>>;

/// Save callback that keeps the export for the command to emit afterwards.
fn capture_save() -> (SavedRecords, impl FnMut(Vec<TreeRecord<Payload>>) + 'static) {
    let saved: SavedRecords = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&saved);
    (saved, move |records| {
        *sink.borrow_mut() = Some(records);
    })
}

fn emit(container: &ServiceContainer, path: &Path, saved: SavedRecords, write: bool) -> CliResult<()> {
    let records = saved.borrow_mut().take().unwrap_or_default();
    if write {
        container
            .store
            .save(path, &records, container.settings.pretty)?;
        output::success(&format!("saved {}", path.display()));
    } else {
        println!("{}", to_json(&records, container.settings.pretty)?);
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, path: &Path) -> CliResult<()> {
    let tree: Tree<Payload> = container.store.load(path)?;
    let label = label_renderer(container.settings.label_field.clone());
    println!("{}", render_tree(&tree, &label, &HashSet::new(), false));
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_export(container: &ServiceContainer, path: &Path) -> CliResult<()> {
    let tree: Tree<Payload> = container.store.load(path)?;
    println!("{}", to_json(&tree.to_array(), container.settings.pretty)?);
    Ok(())
}

/// The command line is the editor form: it commits its record once.
#[instrument(level = "debug", skip(container, fields))]
fn cmd_add(
    container: &ServiceContainer,
    path: &Path,
    parent: &NodeId,
    id: &NodeId,
    fields: &[String],
    write: bool,
) -> CliResult<()> {
    let mut data = Payload::new();
    for field in fields {
        let (key, value) = parse_field(field)
            .ok_or_else(|| CliError::InvalidArgs(format!("field must be KEY=VALUE, KEY not id or children: {}", field)))?;
        data.insert(key, value);
    }

    let tree: Tree<Payload> = container.store.load_or_new(path)?;
    let parent = find_node(&tree, parent)?;

    let mut pending = Some(Record::new(id.clone(), data));
    let editor = move |_: &TreeNode<Payload>| -> ApplicationResult<EditorOutcome<Payload>> {
        Ok(pending
            .take()
            .map(EditorOutcome::Commit)
            .unwrap_or(EditorOutcome::Cancel))
    };
    let (saved, on_save) = capture_save();
    let mut controller = EditController::new(tree, editor, on_save);

    let outcome = controller.open_editor(parent)?;
    debug!("add: {:?}", outcome);
    controller.save();
    emit(container, path, saved, write)
}

#[instrument(level = "debug", skip(container, payload))]
fn cmd_drop(
    container: &ServiceContainer,
    path: &Path,
    target: &NodeId,
    payload: &str,
    write: bool,
) -> CliResult<()> {
    let tree: Tree<Payload> = container.store.load_or_new(path)?;
    let target = find_node(&tree, target)?;

    let no_editor = |_: &TreeNode<Payload>| -> ApplicationResult<EditorOutcome<Payload>> {
        Ok(EditorOutcome::Cancel)
    };
    let (saved, on_save) = capture_save();
    let mut controller = EditController::new(tree, no_editor, on_save);

    controller.drag_enter();
    let outcome = controller.drop_json(target, payload)?;
    debug!("drop: {:?}", outcome);
    controller.save();
    emit(container, path, saved, write)
}
