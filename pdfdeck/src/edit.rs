//! Textual edit commands.
//!
//! Each command maps onto one [`PageCollection`] operation. Positions are
//! one-based and resolved against the collection when the command is
//! applied, so `move 1 3` followed by `select 3` selects the page that was
//! just moved.
//!
//! | command                  | effect                                 |
//! |--------------------------|----------------------------------------|
//! | `select RANGE`           | toggle selection of pages in RANGE     |
//! | `select-all`, `all`      | select every page                      |
//! | `deselect-all`, `none`   | clear the selection                    |
//! | `rotate`                 | rotate selected pages 90° clockwise    |
//! | `delete`                 | delete selected pages                  |
//! | `move FROM TO`           | move the page at FROM to position TO   |
//! | `clear`                  | remove every page                      |
//!
//! Scripts hold one command per line. Blank lines are skipped and `#` starts
//! a comment.

use std::fmt;
use std::str::FromStr;

use crate::collection::PageCollection;
use crate::config::PageRange;
use crate::error::{PdfDeckError, Result};

/// One edit applied to a [`PageCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Toggle selection of the pages at these positions.
    Select(PageRange),
    /// Select every page.
    SelectAll,
    /// Clear the selection.
    DeselectAll,
    /// Rotate selected pages a quarter turn clockwise.
    Rotate,
    /// Delete selected pages.
    Delete,
    /// Move the page at one-based position `from` to one-based position `to`.
    Move {
        /// Current position.
        from: usize,
        /// Target position.
        to: usize,
    },
    /// Remove every page.
    Clear,
}

impl EditCommand {
    /// Parse a single command, reporting errors against `line`.
    ///
    /// Returns `Ok(None)` for blank lines and comments.
    pub fn parse_line(line: usize, text: &str) -> Result<Option<Self>> {
        let content = match text.find('#') {
            Some(idx) => &text[..idx],
            None => text,
        };
        let mut words = content.split_whitespace();
        let Some(keyword) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();
        let invalid = |details: String| PdfDeckError::invalid_edit(line, text.trim(), details);

        let expect_no_args = |command: Self| {
            if args.is_empty() {
                Ok(command)
            } else {
                Err(invalid(format!("'{keyword}' takes no arguments")))
            }
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "select" => {
                if args.is_empty() {
                    return Err(invalid("'select' needs a page range, e.g. 'select 1-3,7'".into()));
                }
                // Ranges may be written with spaces, as in "select 1 - 3, 7".
                let range = PageRange::parse(&args.join(""))
                    .map_err(|e| invalid(format!("{e:#}")))?;
                Self::Select(range)
            }
            "select-all" | "all" => expect_no_args(Self::SelectAll)?,
            "deselect-all" | "none" => expect_no_args(Self::DeselectAll)?,
            "rotate" => expect_no_args(Self::Rotate)?,
            "delete" => expect_no_args(Self::Delete)?,
            "clear" => expect_no_args(Self::Clear)?,
            "move" => {
                let [from, to] = args.as_slice() else {
                    return Err(invalid("'move' needs two positions, e.g. 'move 5 1'".into()));
                };
                Self::Move {
                    from: parse_position(from).map_err(invalid)?,
                    to: parse_position(to).map_err(invalid)?,
                }
            }
            other => return Err(invalid(format!("unknown command '{other}'"))),
        };

        Ok(Some(command))
    }

    /// Parse a whole script, one command per line.
    ///
    /// # Errors
    ///
    /// Returns the first [`PdfDeckError::InvalidEditCommand`], carrying its
    /// one-based line number.
    pub fn parse_script(script: &str) -> Result<Vec<Self>> {
        let mut commands = Vec::new();
        for (idx, text) in script.lines().enumerate() {
            if let Some(command) = Self::parse_line(idx + 1, text)? {
                commands.push(command);
            }
        }
        Ok(commands)
    }

    /// Apply the command to `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDeckError::IndexOutOfBounds`] if a position is beyond the
    /// current collection length. The collection is left unchanged in that
    /// case.
    pub fn apply(&self, collection: &mut PageCollection) -> Result<()> {
        log::debug!("applying edit: {self}");
        match self {
            Self::Select(range) => {
                let len = collection.len();
                let last = range.last_page() as usize;
                if last > len {
                    return Err(PdfDeckError::index_out_of_bounds(last - 1, len));
                }
                let ids: Vec<_> = range
                    .to_pages(len as u32)
                    .into_iter()
                    .filter_map(|page| collection.id_at(page as usize - 1))
                    .collect();
                for id in ids {
                    collection.toggle_select(id);
                }
            }
            Self::SelectAll => collection.select_all(),
            Self::DeselectAll => collection.deselect_all(),
            Self::Rotate => {
                collection.rotate_selected();
            }
            Self::Delete => {
                collection.delete_selected();
            }
            Self::Move { from, to } => collection.reorder(from - 1, to - 1)?,
            Self::Clear => collection.clear(),
        }
        Ok(())
    }
}

impl FromStr for EditCommand {
    type Err = PdfDeckError;

    /// Parse a command given outside a script, reported as line 1.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse_line(1, s)?
            .ok_or_else(|| PdfDeckError::invalid_edit(1, s.trim(), "empty command"))
    }
}

impl fmt::Display for EditCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(range) => write!(f, "select {range}"),
            Self::SelectAll => f.write_str("select-all"),
            Self::DeselectAll => f.write_str("deselect-all"),
            Self::Rotate => f.write_str("rotate"),
            Self::Delete => f.write_str("delete"),
            Self::Move { from, to } => write!(f, "move {from} {to}"),
            Self::Clear => f.write_str("clear"),
        }
    }
}

fn parse_position(word: &str) -> std::result::Result<usize, String> {
    match word.parse::<usize>() {
        Ok(0) => Err("positions start at 1".to_string()),
        Ok(position) => Ok(position),
        Err(_) => Err(format!("'{word}' is not a page position")),
    }
}

/// Apply `commands` in order, stopping at the first failure.
///
/// Commands before the failing one stay applied.
pub fn apply_all(commands: &[EditCommand], collection: &mut PageCollection) -> Result<()> {
    for command in commands {
        command.apply(collection)?;
    }
    Ok(())
}
