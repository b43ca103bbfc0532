// A small model of the command-block world, covering the commands the
// generator emits. Good enough to run a generated computer end to end.

use chainforge::codegen::output::{Listing, CHAIN_BLOCK};
use std::collections::HashMap;

pub type BlockPos = (i32, i32, i32);

/// Chains longer than this are assumed to be runaway relocations
const STEP_LIMIT: usize = 200_000;

#[derive(Debug, Clone, PartialEq)]
pub enum WorldBlock {
    Command {
        command: String,
        chain: bool,
        auto: bool,
    },
    Barrel {
        counts: [i32; 2],
    },
}

#[derive(Debug, Clone, PartialEq)]
struct SimEntity {
    tag: String,
    pos: [f64; 3],
}

#[derive(Debug, Clone, Copy)]
struct Context {
    pos: [f64; 3],
}

enum StoreKind {
    Result,
    Success,
}

enum StoreSlot {
    Score(String),
    EntityPos(String, usize, f64),
    BarrelCount(BlockPos, usize),
}

#[derive(Debug, Default)]
pub struct World {
    blocks: HashMap<BlockPos, WorldBlock>,
    scores: HashMap<String, i32>,
    entities: Vec<SimEntity>,
    pub chat: Vec<String>,
    pub commands_run: usize,
}

/// Splits off the first space-separated token
fn token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(' ') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => (text, ""),
    }
}

fn take<'a>(rest: &mut &'a str) -> &'a str {
    let (tok, remaining) = token(rest);
    *rest = remaining;
    tok
}

fn selector_tag(selector: &str) -> String {
    let start = selector
        .find("tag=")
        .unwrap_or_else(|| panic!("selector without tag: {}", selector))
        + 4;
    let end = selector[start..]
        .find(|c| c == ',' || c == ']')
        .map(|i| start + i)
        .unwrap_or(selector.len());
    selector[start..end].to_string()
}

fn floor_div(a: i32, b: i32) -> i32 {
    let q = a.wrapping_div(b);
    if a % b != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

fn floor_mod(a: i32, b: i32) -> i32 {
    ((a % b) + b) % b
}

fn slot_of(path: &str) -> usize {
    match path {
        "Items[0].Count" => 0,
        "Items[1].Count" => 1,
        other => panic!("unsupported block path {}", other),
    }
}

fn in_range(value: i32, range: &str) -> bool {
    let value = value as i64;
    match range.split_once("..") {
        None => value == range.parse::<i64>().unwrap(),
        Some((low, high)) => {
            (low.is_empty() || value >= low.parse::<i64>().unwrap())
                && (high.is_empty() || value <= high.parse::<i64>().unwrap())
        }
    }
}

impl World {
    pub fn new() -> Self {
        World::default()
    }

    pub fn from_listing(listing: &Listing) -> Self {
        let mut world = World::new();
        for placed in listing.blocks() {
            let p = &placed.position;
            world.blocks.insert(
                (p.x.value, p.y.value, p.z.value),
                WorldBlock::Command {
                    command: placed.command.text().to_string(),
                    chain: placed.block_id == CHAIN_BLOCK,
                    auto: placed.auto,
                },
            );
        }
        world
    }

    pub fn score(&self, name: &str) -> i32 {
        *self
            .scores
            .get(name)
            .unwrap_or_else(|| panic!("no score for {}", name))
    }

    pub fn set_score(&mut self, name: &str, value: i32) {
        self.scores.insert(name.to_string(), value);
    }

    pub fn block(&self, pos: BlockPos) -> Option<&WorldBlock> {
        self.blocks.get(&pos)
    }

    pub fn barrel(&self, pos: BlockPos) -> [i32; 2] {
        match self.blocks.get(&pos) {
            Some(WorldBlock::Barrel { counts }) => *counts,
            other => panic!("no barrel at {:?}: {:?}", pos, other),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Triggers the command block at `start` and follows its chain along +X
    pub fn run_chain(&mut self, start: BlockPos) {
        let mut pos = start;
        let mut steps = 0;
        loop {
            let command = match self.blocks.get(&pos) {
                Some(WorldBlock::Command {
                    command,
                    chain,
                    auto,
                }) => {
                    if pos != start && !(*chain && *auto) {
                        break;
                    }
                    command.clone()
                }
                _ => break,
            };
            let ctx = Context {
                pos: [
                    pos.0 as f64 + 0.5,
                    pos.1 as f64 + 0.5,
                    pos.2 as f64 + 0.5,
                ],
            };
            self.run_command(&command, ctx);
            steps += 1;
            assert!(steps < STEP_LIMIT, "chain at {:?} does not terminate", start);
            pos.0 += 1;
        }
    }

    fn get(&self, name: &str) -> i32 {
        self.scores.get(name).copied().unwrap_or(0)
    }

    fn entity(&self, selector: &str) -> Option<usize> {
        let tag = selector_tag(selector);
        self.entities.iter().position(|e| e.tag == tag)
    }

    fn block_coords(ctx: Context, rest: &mut &str) -> BlockPos {
        let mut out = [0i32; 3];
        for (axis, slot) in out.iter_mut().enumerate() {
            let raw = take(rest);
            *slot = match raw.strip_prefix('~') {
                Some("") => ctx.pos[axis].floor() as i32,
                Some(offset) => (ctx.pos[axis] + offset.parse::<f64>().unwrap()).floor() as i32,
                None => raw.parse::<f64>().unwrap().floor() as i32,
            };
        }
        (out[0], out[1], out[2])
    }

    fn exact_coords(ctx: Context, rest: &mut &str) -> [f64; 3] {
        let mut out = [0f64; 3];
        for (axis, slot) in out.iter_mut().enumerate() {
            let raw = take(rest);
            *slot = match raw.strip_prefix('~') {
                Some("") => ctx.pos[axis],
                Some(offset) => ctx.pos[axis] + offset.parse::<f64>().unwrap(),
                None => raw.parse::<f64>().unwrap(),
            };
        }
        out
    }

    /// Runs one command; `None` means it failed
    fn run_command(&mut self, text: &str, ctx: Context) -> Option<i32> {
        if text.is_empty() {
            return None;
        }
        self.commands_run += 1;
        let mut rest = text;
        match take(&mut rest) {
            "execute" => self.execute(rest, ctx),
            "scoreboard" => self.scoreboard(rest),
            "summon" => {
                let _kind = take(&mut rest);
                let pos = Self::exact_coords(ctx, &mut rest);
                let start = rest.find("Tags:['").expect("summon without tag") + 7;
                let end = start + rest[start..].find('\'').expect("unterminated tag");
                self.entities.push(SimEntity {
                    tag: rest[start..end].to_string(),
                    pos,
                });
                Some(1)
            }
            "kill" => {
                let index = self.entity(take(&mut rest))?;
                self.entities.remove(index);
                Some(1)
            }
            "tp" => {
                let index = self.entity(take(&mut rest))?;
                self.entities[index].pos = Self::exact_coords(ctx, &mut rest);
                Some(1)
            }
            "clone" => {
                let from = Self::block_coords(ctx, &mut rest);
                let to = Self::block_coords(ctx, &mut rest);
                let dest = Self::block_coords(ctx, &mut rest);
                let masked = take(&mut rest) == "masked";
                self.clone_region(from, to, dest, masked)
            }
            "fill" => {
                let from = Self::block_coords(ctx, &mut rest);
                let to = Self::block_coords(ctx, &mut rest);
                let block = if rest.starts_with(CHAIN_BLOCK) {
                    WorldBlock::Command {
                        command: String::new(),
                        chain: true,
                        auto: rest.contains("auto:1b"),
                    }
                } else if rest.starts_with("minecraft:barrel") {
                    WorldBlock::Barrel { counts: [1, 1] }
                } else {
                    panic!("unsupported fill block: {}", rest)
                };
                let mut placed = 0;
                for x in from.0.min(to.0)..=from.0.max(to.0) {
                    for y in from.1.min(to.1)..=from.1.max(to.1) {
                        for z in from.2.min(to.2)..=from.2.max(to.2) {
                            self.blocks.insert((x, y, z), block.clone());
                            placed += 1;
                        }
                    }
                }
                Some(placed)
            }
            "data" => self.data(rest, ctx),
            "tellraw" => {
                let start = rest.find("\"name\":\"").expect("tellraw without score") + 8;
                let end = start + rest[start..].find('"').expect("unterminated name");
                let value = self.get(&rest[start..end]);
                self.chat.push(value.to_string());
                Some(1)
            }
            "say" => {
                self.chat.push(rest.to_string());
                Some(1)
            }
            other => panic!("unsupported command '{}' in: {}", other, text),
        }
    }

    fn clone_region(&mut self, from: BlockPos, to: BlockPos, dest: BlockPos, masked: bool) -> Option<i32> {
        let low = (from.0.min(to.0), from.1.min(to.1), from.2.min(to.2));
        let high = (from.0.max(to.0), from.1.max(to.1), from.2.max(to.2));
        let mut snapshot = Vec::new();
        for x in low.0..=high.0 {
            for y in low.1..=high.1 {
                for z in low.2..=high.2 {
                    let offset = (x - low.0, y - low.1, z - low.2);
                    snapshot.push((offset, self.blocks.get(&(x, y, z)).cloned()));
                }
            }
        }
        let mut copied = 0;
        for ((dx, dy, dz), block) in snapshot {
            let target = (dest.0 + dx, dest.1 + dy, dest.2 + dz);
            match block {
                Some(block) => {
                    self.blocks.insert(target, block);
                    copied += 1;
                }
                None if !masked => {
                    self.blocks.remove(&target);
                }
                None => {}
            }
        }
        Some(copied)
    }

    fn data(&mut self, mut rest: &str, ctx: Context) -> Option<i32> {
        let verb = take(&mut rest);
        assert_eq!(take(&mut rest), "block", "only block data is modelled");
        let pos = Self::block_coords(ctx, &mut rest);
        let slot = slot_of(take(&mut rest));
        match verb {
            "get" => match self.blocks.get(&pos) {
                Some(WorldBlock::Barrel { counts }) => Some(counts[slot]),
                _ => None,
            },
            "modify" => {
                assert_eq!(take(&mut rest), "set");
                assert_eq!(take(&mut rest), "value");
                let value: i32 = take(&mut rest).trim_end_matches('b').parse().unwrap();
                match self.blocks.get_mut(&pos) {
                    Some(WorldBlock::Barrel { counts }) => {
                        counts[slot] = value;
                        Some(1)
                    }
                    _ => None,
                }
            }
            other => panic!("unsupported data verb {}", other),
        }
    }

    fn scoreboard(&mut self, mut rest: &str) -> Option<i32> {
        match take(&mut rest) {
            "objectives" => Some(0),
            "players" => {
                let verb = take(&mut rest);
                let name = take(&mut rest).to_string();
                let _objective = take(&mut rest);
                match verb {
                    "set" => {
                        let value = take(&mut rest).parse().unwrap();
                        self.scores.insert(name, value);
                        Some(value)
                    }
                    "add" | "remove" => {
                        let amount: i32 = take(&mut rest).parse().unwrap();
                        let amount = if verb == "add" { amount } else { -amount };
                        let value = self.get(&name).wrapping_add(amount);
                        self.scores.insert(name, value);
                        Some(value)
                    }
                    "reset" => {
                        self.scores.remove(&name);
                        Some(0)
                    }
                    "get" => self.scores.get(&name).copied(),
                    "operation" => {
                        let op = take(&mut rest);
                        let source = take(&mut rest).to_string();
                        let (a, b) = (self.get(&name), self.get(&source));
                        let value = match op {
                            "=" => b,
                            "+=" => a.wrapping_add(b),
                            "-=" => a.wrapping_sub(b),
                            "*=" => a.wrapping_mul(b),
                            "/=" if b == 0 => a,
                            "/=" => floor_div(a, b),
                            "%=" if b == 0 => a,
                            "%=" => floor_mod(a, b),
                            "<" => a.min(b),
                            ">" => a.max(b),
                            "><" => {
                                self.scores.insert(source, a);
                                b
                            }
                            other => panic!("unsupported operation {}", other),
                        };
                        self.scores.insert(name, value);
                        Some(value)
                    }
                    other => panic!("unsupported scoreboard verb {}", other),
                }
            }
            other => panic!("unsupported scoreboard command {}", other),
        }
    }

    fn condition(&self, rest: &mut &str) -> bool {
        match take(rest) {
            "entity" => self.entity(take(rest)).is_some(),
            "score" => {
                let left = self.get(take(rest));
                let _objective = take(rest);
                let op = take(rest);
                if op == "matches" {
                    return in_range(left, take(rest));
                }
                let right = self.get(take(rest));
                let _objective = take(rest);
                match op {
                    "<" => left < right,
                    "<=" => left <= right,
                    "=" => left == right,
                    ">=" => left >= right,
                    ">" => left > right,
                    other => panic!("unsupported comparison {}", other),
                }
            }
            other => panic!("unsupported condition {}", other),
        }
    }

    fn execute(&mut self, mut rest: &str, mut ctx: Context) -> Option<i32> {
        let mut stores: Vec<(StoreKind, StoreSlot)> = Vec::new();
        loop {
            match take(&mut rest) {
                "at" => {
                    let index = self.entity(take(&mut rest))?;
                    ctx.pos = self.entities[index].pos;
                }
                "as" => {
                    self.entity(take(&mut rest))?;
                }
                "if" => {
                    if !self.condition(&mut rest) {
                        return None;
                    }
                }
                "unless" => {
                    if self.condition(&mut rest) {
                        return None;
                    }
                }
                "store" => {
                    let kind = match take(&mut rest) {
                        "result" => StoreKind::Result,
                        "success" => StoreKind::Success,
                        other => panic!("unsupported store kind {}", other),
                    };
                    let slot = match take(&mut rest) {
                        "score" => {
                            let name = take(&mut rest).to_string();
                            let _objective = take(&mut rest);
                            StoreSlot::Score(name)
                        }
                        "entity" => {
                            let tag = selector_tag(take(&mut rest));
                            let path = take(&mut rest);
                            let axis = match path {
                                "Pos[0]" => 0,
                                "Pos[1]" => 1,
                                "Pos[2]" => 2,
                                other => panic!("unsupported entity path {}", other),
                            };
                            let _kind = take(&mut rest);
                            let scale = take(&mut rest).parse().unwrap();
                            StoreSlot::EntityPos(tag, axis, scale)
                        }
                        "block" => {
                            let pos = Self::block_coords(ctx, &mut rest);
                            let slot = slot_of(take(&mut rest));
                            let _kind = take(&mut rest);
                            let _scale = take(&mut rest);
                            StoreSlot::BarrelCount(pos, slot)
                        }
                        other => panic!("unsupported store target {}", other),
                    };
                    stores.push((kind, slot));
                }
                "run" => {
                    let result = self.run_command(rest, ctx);
                    for (kind, slot) in stores {
                        let value = match kind {
                            StoreKind::Result => result.unwrap_or(0),
                            StoreKind::Success => result.is_some() as i32,
                        };
                        self.store(slot, value);
                    }
                    return result;
                }
                other => panic!("unsupported execute clause '{}'", other),
            }
        }
    }

    fn store(&mut self, slot: StoreSlot, value: i32) {
        match slot {
            StoreSlot::Score(name) => {
                self.scores.insert(name, value);
            }
            StoreSlot::EntityPos(tag, axis, scale) => {
                if let Some(entity) = self.entities.iter_mut().find(|e| e.tag == tag) {
                    entity.pos[axis] = value as f64 * scale;
                }
            }
            StoreSlot::BarrelCount(pos, slot) => {
                if let Some(WorldBlock::Barrel { counts }) = self.blocks.get_mut(&pos) {
                    counts[slot] = value;
                }
            }
        }
    }
}
