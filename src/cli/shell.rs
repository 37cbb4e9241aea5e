//! Menu-driven interactive shell.
//!
//! Mirrors the classic catalog menu: pick or create a catalog file, then
//! search, list, add and delete until the user quits. Errors are reported
//! and the menu continues.

use std::path::PathBuf;

use anyhow::Result;

use super::prompt::{ask_required, collect_items, confirm, LineEditor, Prompter};
use super::with_json_extension;
use crate::domain::fields;
use crate::library::{render_views, Catalog, Highlight, SearchScope};

const WIDTH: usize = 60;

/// Run the shell until the user quits or input ends.
pub fn run(catalog_path: Option<PathBuf>, highlight: Highlight) -> Result<()> {
    let mut editor = LineEditor::new()?;

    let Some(catalog) = select_catalog(&mut editor, catalog_path)? else {
        return Ok(());
    };
    let mut catalog = catalog.with_highlight(highlight);

    main_menu(&mut editor, &mut catalog)?;
    println!("Goodbye.");
    Ok(())
}

/// Open the given catalog, or ask the user to create or import one.
fn select_catalog<P: Prompter>(
    prompter: &mut P,
    catalog_path: Option<PathBuf>,
) -> Result<Option<Catalog>> {
    if let Some(path) = catalog_path {
        if path.is_file() {
            match Catalog::open(&path) {
                Ok(catalog) => return Ok(Some(catalog)),
                Err(e) => report(&anyhow::Error::from(e)),
            }
        } else {
            eprintln!("Catalog not found: {}", path.display());
        }
    }

    loop {
        print_menu(
            "Library Catalog",
            &[
                "Create a new Catalog",
                "Import Catalog from json file",
                "Quit",
            ],
        );

        match choose(prompter, 3)? {
            Some(1) => {
                if let Some(catalog) = create_catalog(prompter)? {
                    return Ok(Some(catalog));
                }
            }
            Some(2) => {
                let Some(name) = ask_required(prompter, "Enter file name")? else {
                    return Ok(None);
                };
                let path = with_json_extension(PathBuf::from(name));
                if !path.is_file() {
                    eprintln!("Error: File not found.");
                    continue;
                }
                match Catalog::open(&path) {
                    Ok(catalog) => return Ok(Some(catalog)),
                    Err(e) => report(&anyhow::Error::from(e)),
                }
            }
            _ => return Ok(None),
        }
    }
}

fn create_catalog<P: Prompter>(prompter: &mut P) -> Result<Option<Catalog>> {
    print_header("Create a new Catalog");
    let Some(name) = ask_required(prompter, "Enter file name")? else {
        return Ok(None);
    };
    let path = with_json_extension(PathBuf::from(name));

    if path.exists()
        && !confirm(
            prompter,
            "File exists. Doing this will delete all content of the file. Continue?",
        )?
    {
        println!("Aborted.");
        return Ok(None);
    }

    loop {
        let records = collect_items(prompter)?;
        if !records.is_empty() {
            return Ok(Some(Catalog::create(&path, records)?));
        }
        eprintln!("Error: You have to add at least 1 item to the library.");
        if !confirm(prompter, "Try again?")? {
            return Ok(None);
        }
    }
}

fn main_menu<P: Prompter>(prompter: &mut P, catalog: &mut Catalog) -> Result<()> {
    loop {
        print_menu(
            "Welcome to Library Catalog",
            &[
                "Search for items with a keyword",
                "List all items in the library",
                "Add items",
                "Delete items",
                "Quit",
            ],
        );

        let outcome = match choose(prompter, 5)? {
            Some(1) => search_menu(prompter, catalog),
            Some(2) => {
                list_items(catalog);
                Ok(())
            }
            Some(3) => add_items(prompter, catalog),
            Some(4) => delete_items(prompter, catalog).map(|_| ()),
            _ => return Ok(()),
        };

        if let Err(e) = outcome {
            report(&e);
        }
    }
}

fn search_menu<P: Prompter>(prompter: &mut P, catalog: &Catalog) -> Result<()> {
    loop {
        print_menu(
            "Search for items with a keyword",
            &[
                "Search by title",
                "Search by contributors",
                "Search by UPC",
                "Back",
            ],
        );

        let (title, scope) = match choose(prompter, 4)? {
            Some(1) => ("Search by title", SearchScope::field(fields::TITLE)),
            Some(2) => ("Search by contributors", SearchScope::Contributor),
            Some(3) => ("Search by UPC", SearchScope::field(fields::UPC)),
            _ => return Ok(()),
        };

        print_header(title);
        let Some(keyword) = prompter.ask("Enter a keyword")? else {
            return Ok(());
        };

        match catalog.search(&keyword, &scope) {
            Ok(results) => {
                print_header(&format!("Found {} items", results.len()));
                print!("{}", render_views(&results));
            }
            Err(e) => report(&anyhow::Error::from(e)),
        }
    }
}

fn list_items(catalog: &Catalog) {
    for (kind, views) in catalog.list_all().iter() {
        print_header(&format!("{}: {} items", kind, views.len()));
        print!("{}", render_views(views));
    }
}

fn add_items<P: Prompter>(prompter: &mut P, catalog: &mut Catalog) -> Result<()> {
    print_header("Add item");
    let records = collect_items(prompter)?;
    let added = catalog.add_items(records)?;
    println!("Added {} items to library.", added);
    Ok(())
}

/// Preview matches, confirm, then delete. Returns the number removed.
fn delete_items<P: Prompter>(prompter: &mut P, catalog: &mut Catalog) -> Result<usize> {
    print_header("Delete item");
    let Some(keyword) = ask_required(prompter, "Enter the title of the item you want to delete")?
    else {
        return Ok(0);
    };

    let matches = catalog.delete_preview(&keyword)?;
    if matches.is_empty() {
        println!("Found 0 items...");
        return Ok(0);
    }
    print!("{}", render_views(&matches));

    if !confirm(prompter, "Are you sure you want to delete these items?")? {
        println!("Aborted.");
        return Ok(0);
    }

    let removed = catalog.delete_by_title_keyword(&keyword)?;
    println!("Deleted {} items.", removed);
    Ok(removed)
}

/// Ask for a menu number in `1..=max`; `None` when input ends.
fn choose<P: Prompter>(prompter: &mut P, max: usize) -> Result<Option<usize>> {
    loop {
        let Some(answer) = prompter.ask(&format!("Enter a number (1-{})", max))? else {
            return Ok(None);
        };
        match answer.trim().parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
            _ => eprintln!("Error: Invalid value."),
        }
    }
}

fn print_header(title: &str) {
    println!("+{}+", "-".repeat(WIDTH - 2));
    println!("| {:<width$} |", title, width = WIDTH - 4);
    println!("+{}+", "-".repeat(WIDTH - 2));
}

fn print_menu(title: &str, entries: &[&str]) {
    print_header(title);
    for (i, entry) in entries.iter().enumerate() {
        println!("  {}. {}", i + 1, entry);
    }
}

fn report(error: &anyhow::Error) {
    eprintln!("Error: {:#}", error);
}
