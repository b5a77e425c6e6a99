// src/input.rs

use anyhow::{Context, Result};
use log::debug;
use std::io::{BufRead, Write};

use crate::config::INPUT_TERMINATOR;

pub const PROMPT: &str = "Enter next entity: ";

/// Writes the instructions shown before interactive collection.
pub fn write_banner<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, "\nWelcome! Here's how the engine works:\n")?;
    writeln!(writer, "- Enter an entity you would like to normalize and press Enter.")?;
    writeln!(writer, "- Repeat until all of your entities have been entered.")?;
    writeln!(writer, "- Type \"{}\" when you're done entering entities.", INPUT_TERMINATOR)?;
    writeln!(
        writer,
        "- Wait for the entities to be normalized and saved as a CSV file.\n"
    )?;
    writer.flush().context("Failed to flush banner")?;
    Ok(())
}

/// Reads one mention per line until a line equal to the terminator or the
/// end of input.
///
/// The prompt is written to `prompt_writer` before each line is read. Only
/// the line ending is stripped; everything else, including blank lines and
/// surrounding spaces, is kept as entered. The terminator itself is never
/// returned.
pub fn collect_mentions<R: BufRead, W: Write>(
    mut reader: R,
    prompt_writer: &mut W,
) -> Result<Vec<String>> {
    let mut mentions = Vec::new();

    loop {
        write!(prompt_writer, "{}", PROMPT)?;
        prompt_writer.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let bytes_read = reader
            .read_line(&mut line)
            .context("Failed to read mention")?;
        if bytes_read == 0 {
            debug!("End of input after {} mentions", mentions.len());
            break;
        }

        let mention = strip_line_ending(&line);
        if mention == INPUT_TERMINATOR {
            debug!("Terminator received after {} mentions", mentions.len());
            break;
        }
        mentions.push(mention.to_string());
    }

    Ok(mentions)
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
