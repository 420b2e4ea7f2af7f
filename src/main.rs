//! todograph CLI - todo lists with a task relationship graph.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use todograph::{Storage, Task, TaskId, TaskList, TaskManager};

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todograph")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("todograph.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_store_dir(cli: &Cli) -> PathBuf {
    cli.dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn open(store_dir: &Path) -> Result<(Storage, TaskManager)> {
    let storage = Storage::open(store_dir).context("Failed to open store")?;
    let manager = TaskManager::load(&storage)?;
    Ok((storage, manager))
}

fn print_task_line(task: &Task, indent: usize) {
    let deps = task.dependencies();
    let marker = if deps.blocked_by().is_empty() {
        "○".green()
    } else {
        "⊘".red()
    };
    println!(
        "{}{} {} {}",
        "  ".repeat(indent),
        marker,
        task.id().as_str().cyan(),
        task.title
    );
}

/// Print roots first, each followed by its children.
fn print_tree(list: &TaskList, task: &Task, depth: usize) {
    print_task_line(task, depth + 1);
    for child_id in task.dependencies().children() {
        if let Some(child) = list.get(child_id) {
            print_tree(list, child, depth + 1);
        }
    }
}

fn print_ids(label: &str, ids: &[TaskId]) {
    if !ids.is_empty() {
        let joined: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        println!("{}: {}", label.bold(), joined.join(", "));
    }
}

fn run(cli: Cli) -> Result<()> {
    let store_dir = get_store_dir(&cli);

    match cli.command {
        Command::Init => {
            Storage::init(&store_dir).context("Failed to initialize store")?;
            println!("{} Initialized store in {}", "✓".green(), store_dir.display());
        }

        Command::NewList { name } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            let id = manager.create_list(&name).id().clone();
            manager.save_list(id.as_str(), &mut storage)?;

            println!("{} Created list: {} {}", "✓".green(), id.as_str().cyan(), name);
        }

        Command::Lists => {
            let (_storage, manager) = open(&store_dir)?;
            if manager.lists().is_empty() {
                println!("{}", "No lists found".dimmed());
            }
            for list in manager.lists() {
                println!(
                    "{} {} {}",
                    list.id().as_str().cyan(),
                    list.name,
                    format!("({} tasks)", list.len()).dimmed()
                );
            }
        }

        Command::Add {
            list,
            title,
            description,
        } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            let id = manager
                .add_task(&list, &title, description.as_deref())
                .context("Failed to create task")?;
            manager.save_list(&list, &mut storage)?;

            println!("{} Created: {} {}", "✓".green(), id.as_str().cyan(), title);
        }

        Command::Show { list } => {
            let (_storage, manager) = open(&store_dir)?;
            let list = manager.find(&list)?;

            if list.is_empty() {
                println!("{}", "No tasks".dimmed());
            } else {
                println!("{} {}", list.name.bold(), list.id().as_str().dimmed());
                for task in list.tasks().filter(|t| t.dependencies().parent().is_none()) {
                    print_tree(list, task, 0);
                }
            }
        }

        Command::Get { list, id } => {
            let (_storage, manager) = open(&store_dir)?;
            let list = manager.find(&list)?;
            let id = TaskId::from(id);

            match list.get(&id) {
                Some(task) => {
                    let deps = task.dependencies();
                    println!("{}: {}", "ID".bold(), task.id().as_str().cyan());
                    println!("{}: {}", "Title".bold(), task.title);
                    if let Some(desc) = &task.description {
                        println!("{}: {}", "Description".bold(), desc);
                    }
                    println!("{}: {}", "Created".bold(), task.created_at);
                    if let Some(parent) = deps.parent() {
                        println!("{}: {}", "Parent".bold(), parent.as_str().cyan());
                    }
                    print_ids("Children", deps.children().as_slice());
                    print_ids("Blocked by", deps.blocked_by().as_slice());
                    print_ids("Blocking", deps.blocking().as_slice());
                    print_ids("Related", deps.related().as_slice());
                }
                None => {
                    eprintln!("{} Task not found: {}", "✗".red(), id);
                    std::process::exit(1);
                }
            }
        }

        Command::Block {
            list,
            blocked_id,
            blocker_id,
        } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            manager
                .find_mut(&list)?
                .add_blocker(&TaskId::from(blocked_id.as_str()), &TaskId::from(blocker_id.as_str()))
                .context("Failed to add blocking edge")?;
            manager.save_list(&list, &mut storage)?;

            println!(
                "{} {} is now blocked by {}",
                "✓".green(),
                blocked_id.cyan(),
                blocker_id.cyan()
            );
        }

        Command::Unblock {
            list,
            blocked_id,
            blocker_id,
        } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            manager
                .find_mut(&list)?
                .remove_blocker(&TaskId::from(blocked_id.as_str()), &TaskId::from(blocker_id.as_str()))
                .context("Failed to remove blocking edge")?;
            manager.save_list(&list, &mut storage)?;

            println!(
                "{} {} is no longer blocked by {}",
                "✓".green(),
                blocked_id.cyan(),
                blocker_id.cyan()
            );
        }

        Command::Child {
            list,
            parent_id,
            child_id,
        } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            manager
                .find_mut(&list)?
                .add_child(&TaskId::from(parent_id.as_str()), &TaskId::from(child_id.as_str()))
                .context("Failed to add parent-child relationship")?;
            manager.save_list(&list, &mut storage)?;

            println!(
                "{} {} is now a child of {}",
                "✓".green(),
                child_id.cyan(),
                parent_id.cyan()
            );
        }

        Command::Unchild {
            list,
            parent_id,
            child_id,
        } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            manager
                .find_mut(&list)?
                .remove_child(&TaskId::from(parent_id.as_str()), &TaskId::from(child_id.as_str()))
                .context("Failed to remove parent-child relationship")?;
            manager.save_list(&list, &mut storage)?;

            println!(
                "{} {} removed from children of {}",
                "✓".green(),
                child_id.cyan(),
                parent_id.cyan()
            );
        }

        Command::Relate {
            list,
            first_id,
            second_id,
        } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            manager
                .find_mut(&list)?
                .add_related(&TaskId::from(first_id.as_str()), &TaskId::from(second_id.as_str()))
                .context("Failed to relate tasks")?;
            manager.save_list(&list, &mut storage)?;

            println!("{} {} ↔ {}", "✓".green(), first_id.cyan(), second_id.cyan());
        }

        Command::Unrelate {
            list,
            first_id,
            second_id,
        } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            manager
                .find_mut(&list)?
                .remove_related(&TaskId::from(first_id.as_str()), &TaskId::from(second_id.as_str()))
                .context("Failed to unrelate tasks")?;
            manager.save_list(&list, &mut storage)?;

            println!("{} {} ↮ {}", "✓".green(), first_id.cyan(), second_id.cyan());
        }

        Command::Rm { list, id } => {
            let (mut storage, mut manager) = open(&store_dir)?;
            let task = manager
                .find_mut(&list)?
                .remove_task(&TaskId::from(id))
                .context("Failed to remove task")?;
            manager.save_list(&list, &mut storage)?;

            println!("{} Removed: {} {}", "✓".green(), task.id().as_str().cyan(), task.title);
        }

        Command::Compact => {
            let mut storage = Storage::open(&store_dir).context("Failed to open store")?;
            let dropped = storage.compact().context("Failed to compact store")?;

            println!("{} Compacted store: {} snapshot(s) dropped", "✓".green(), dropped);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
