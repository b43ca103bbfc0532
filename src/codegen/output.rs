// Listing output
//
// A listing has one line per placed block: `x y z block-id [snbt]`. The
// external backend turns it into a schematic.

use crate::codegen::chain_context::{ChainContext, ChainGroup};
use crate::codegen::command::Command;
use crate::codegen::coordinates::{Coordinates, EAST, SOUTH};
use crate::codegen::error::CompilerError;
use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::Path;
use std::process;

pub const IMPULSE_BLOCK: &str = "minecraft:command_block[facing=east]";
pub const CHAIN_BLOCK: &str = "minecraft:chain_command_block[facing=east]";

/// One block of the generated structure
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    pub position: Coordinates,
    pub block_id: String,
    pub command: Command,
    pub auto: bool,
}

impl PlacedBlock {
    pub fn snbt(&self) -> String {
        let mut parts = vec![format!("Command:{}", quote(self.command.text()))];
        if self.auto {
            parts.push("auto:1b".to_string());
        }
        format!("{{{}}}", parts.join(","))
    }
}

impl fmt::Display for PlacedBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.position.x.value,
            self.position.y.value,
            self.position.z.value,
            self.block_id,
            self.snbt()
        )
    }
}

/// Quotes a string the way SNBT (and Python's repr) does: single quotes
/// unless the text contains a single quote and no double quote
pub fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c == delimiter => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                quoted.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => quoted.push(c),
        }
    }
    quoted.push(delimiter);
    quoted
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    blocks: Vec<PlacedBlock>,
}

impl Listing {
    pub fn new() -> Self {
        Listing { blocks: Vec::new() }
    }

    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Lays a chain out along +X starting at `position`
    pub fn write_chain(&mut self, position: Coordinates, chain: &ChainContext) -> Result<(), CompilerError> {
        if chain.is_empty() && !chain.only_chain() {
            return Err(CompilerError::EmptyChain(chain.label().to_string()));
        }
        debug!(
            "placing chain '{}' at {} ({} units)",
            chain.label(),
            position,
            chain.len()
        );
        let mut position = position;
        for (i, command) in chain.contents().iter().enumerate() {
            let impulse = i == 0 && !chain.only_chain();
            self.blocks.push(PlacedBlock {
                position,
                block_id: if impulse { IMPULSE_BLOCK } else { CHAIN_BLOCK }.to_string(),
                command: command.clone(),
                auto: !impulse,
            });
            position = position + EAST;
        }
        Ok(())
    }

    /// Lays out every chain of a group, chain `k` at `position + (0, 0, k)`
    pub fn write_group(&mut self, position: Coordinates, group: &ChainGroup) -> Result<(), CompilerError> {
        let mut position = position;
        for chain in group.chains() {
            self.write_chain(position, chain)?;
            position = position + SOUTH;
        }
        Ok(())
    }

    /// Block at an absolute position, if any
    pub fn block_at(&self, position: Coordinates) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.position == position)
    }

    pub fn render(&self) -> String {
        let mut text = String::new();
        for block in &self.blocks {
            text.push_str(&block.to_string());
            text.push('\n');
        }
        text
    }

    pub fn write_to(&self, path: &Path) -> Result<(), CompilerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        info!("wrote {} blocks to {}", self.blocks.len(), path.display());
        Ok(())
    }
}

/// Runs the external listing-to-schematic converter and waits for it
pub fn run_backend(executable: &Path, listing: &Path, schematic: &Path) -> Result<(), CompilerError> {
    if let Some(parent) = schematic.parent() {
        fs::create_dir_all(parent)?;
    }
    info!(
        "running {} {} {}",
        executable.display(),
        listing.display(),
        schematic.display()
    );
    let status = process::Command::new(executable)
        .arg(listing)
        .arg(schematic)
        .status()
        .map_err(|e| {
            CompilerError::BackendError(format!("failed to start {}: {}", executable.display(), e))
        })?;
    if !status.success() {
        return Err(CompilerError::BackendError(format!(
            "{} exited with {}",
            executable.display(),
            status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_matches_repr() {
        assert_eq!(quote("say hi"), "'say hi'");
        assert_eq!(quote("summon x {Tags:['e0']}"), "\"summon x {Tags:['e0']}\"");
        assert_eq!(quote("a 'b' \"c\""), "'a \\'b\\' \"c\"'");
        assert_eq!(quote("back\\slash"), "'back\\\\slash'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_chain_layout() {
        let chain = ChainContext::with_commands(
            "main",
            vec![Command::new("say a"), Command::new("say b")],
            false,
        );
        let mut listing = Listing::new();
        listing.write_chain(Coordinates::new(0, 0, 1), &chain).unwrap();
        assert_eq!(
            listing.render(),
            "0 0 1 minecraft:command_block[facing=east] {Command:'say a'}\n\
             1 0 1 minecraft:chain_command_block[facing=east] {Command:'say b',auto:1b}\n"
        );
    }

    #[test]
    fn test_only_chain_has_no_impulse_block() {
        let chain = ChainContext::with_commands("op", vec![Command::placeholder()], true);
        let mut listing = Listing::new();
        listing.write_chain(Coordinates::new(0, 1, 3), &chain).unwrap();
        assert_eq!(
            listing.render(),
            "0 1 3 minecraft:chain_command_block[facing=east] {Command:'',auto:1b}\n"
        );
    }

    #[test]
    fn test_empty_chain_rejected() {
        let mut listing = Listing::new();
        let empty = ChainContext::new("main/primary", false);
        assert_eq!(
            listing.write_chain(Coordinates::new(0, 0, 0), &empty),
            Err(CompilerError::EmptyChain("main/primary".to_string()))
        );
        let empty_only = ChainContext::new("ops/nothing", true);
        assert!(listing.write_chain(Coordinates::new(0, 0, 0), &empty_only).is_ok());
        assert!(listing.is_empty());
    }

    #[test]
    fn test_group_grows_south() {
        let mut group = ChainGroup::new("g", true);
        group.add(ChainContext::with_commands("a", vec![Command::new("say a")], true));
        group.add(ChainContext::with_commands("b", vec![Command::new("say b")], true));
        let mut listing = Listing::new();
        listing.write_group(Coordinates::new(0, 2, 0), &group).unwrap();
        assert!(listing.block_at(Coordinates::new(0, 2, 1)).is_some());
        assert_eq!(
            listing.block_at(Coordinates::new(0, 2, 1)).unwrap().command.text(),
            "say b"
        );
    }

    #[test]
    fn test_missing_backend_reports_error() {
        let result = run_backend(
            Path::new("/nonexistent/converter"),
            Path::new("listing.blk"),
            Path::new("/tmp/chainforge-test/out.schematic"),
        );
        assert!(matches!(result, Err(CompilerError::BackendError(_))));
    }
}
