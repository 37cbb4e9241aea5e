//! Interactive input: line editing and guided item entry.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::domain::{
    fields, BookDetails, ContributorGroup, DiscDetails, Item, ItemDetails, ItemKind,
    MagazineDetails, Record,
};

/// Answer that ends a repeated prompt
pub const QUIT: &str = "!q";

/// Source of user answers
pub trait Prompter {
    /// Ask for one line of input. `None` means the input ended (Ctrl-C, Ctrl-D).
    fn ask(&mut self, label: &str) -> Result<Option<String>>;
}

/// Terminal prompter with line editing and history
pub struct LineEditor {
    editor: DefaultEditor,
}

impl LineEditor {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
        Ok(Self { editor })
    }
}

impl Prompter for LineEditor {
    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        match self.editor.readline(&format!("{}: ", label)) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }
}

/// Ask until a non-empty answer is given.
pub fn ask_required<P: Prompter>(prompter: &mut P, label: &str) -> Result<Option<String>> {
    loop {
        match prompter.ask(label)? {
            None => return Ok(None),
            Some(answer) if answer.trim().is_empty() => {
                eprintln!("Error: Cannot enter empty string.");
            }
            Some(answer) => return Ok(Some(answer.trim().to_string())),
        }
    }
}

/// Yes/no question; anything but `y` is a no.
pub fn confirm<P: Prompter>(prompter: &mut P, question: &str) -> Result<bool> {
    let answer = prompter.ask(&format!("{} (y/n)", question))?;
    Ok(answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("y")))
}

/// Guided entry of any number of items, until `!q` or end of input.
pub fn collect_items<P: Prompter>(prompter: &mut P) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    loop {
        let Some(answer) = prompter.ask("Enter item type (Book, CD, DVD, Magazine) or !q to finish")?
        else {
            break;
        };
        let answer = answer.trim();
        if answer == QUIT {
            break;
        }

        let kind: ItemKind = match answer.parse() {
            Ok(kind) => kind,
            Err(_) => {
                eprintln!("Error: Wrong type");
                continue;
            }
        };

        match prompt_item(prompter, kind)? {
            Some(item) => {
                tracing::debug!(title = %item.title, %kind, "Item entered");
                records.push(item.to_record());
            }
            None => break,
        }
    }

    Ok(records)
}

/// Ask for every field of one item of `kind`.
///
/// Returns `None` if the input ends before the item is complete.
pub fn prompt_item<P: Prompter>(prompter: &mut P, kind: ItemKind) -> Result<Option<Item>> {
    let Some(title) = ask_required(prompter, "Enter title")? else {
        return Ok(None);
    };

    let Some(contributors) = prompt_contributors(prompter)? else {
        return Ok(None);
    };

    let mut answers = Vec::with_capacity(kind.detail_fields().len());
    for field in kind.detail_fields() {
        let Some(answer) = ask_required(prompter, &format!("Enter {}", field_label(field)))? else {
            return Ok(None);
        };
        answers.push(answer);
    }
    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();

    let details = match kind {
        ItemKind::Book => ItemDetails::Book(BookDetails {
            subject: next(),
            isbn: next(),
            dds: next(),
        }),
        ItemKind::Cd => ItemDetails::Cd(DiscDetails {
            genre: next(),
            asin: next(),
        }),
        ItemKind::Dvd => ItemDetails::Dvd(DiscDetails {
            genre: next(),
            asin: next(),
        }),
        ItemKind::Magazine => ItemDetails::Magazine(MagazineDetails {
            volume: next(),
            issue: next(),
        }),
    };

    let Some(identifier) = ask_required(prompter, "Enter UPC")? else {
        return Ok(None);
    };

    Ok(Some(Item {
        title,
        identifier,
        contributors,
        details,
    }))
}

fn prompt_contributors<P: Prompter>(prompter: &mut P) -> Result<Option<Vec<ContributorGroup>>> {
    let mut groups: Vec<ContributorGroup> = Vec::new();

    loop {
        let Some(role) = ask_required(prompter, "Enter contributor's type (!q to continue)")? else {
            return Ok(None);
        };
        if role == QUIT {
            if groups.is_empty() {
                eprintln!("Error: Must have at least one contributor");
                continue;
            }
            return Ok(Some(groups));
        }

        let Some(names) = ask_required(prompter, "Enter contributors' names (separated by ', ')")?
        else {
            return Ok(None);
        };

        // A repeated role replaces the earlier entry
        let group = ContributorGroup::parse(role, &names);
        match groups.iter_mut().find(|g| g.role == group.role) {
            Some(existing) => *existing = group,
            None => groups.push(group),
        }
    }
}

fn field_label(field: &str) -> String {
    match field {
        fields::ISBN | fields::DDS | fields::ASIN | fields::UPC => field.to_string(),
        other => other.to_lowercase(),
    }
}
