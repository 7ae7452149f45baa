//! Compile template source into a [`Program`] that can be executed by the
//! renderer.
//!
//! Compilation is a single left-to-right pass. Literal text between commands
//! is collected into the fragment table, command bodies are matched against
//! the small command grammar, and each block command leaves a placeholder
//! jump whose operand is patched once the matching `$(end)` is found.

use crate::types::program::{Instr, Opcode, Program, MAX_OPERAND};
use crate::types::span::Span;
use crate::{Error, Result};

/// Compile a template source into a program.
pub fn program(source: &str) -> Result<Program> {
    Compiler::new(source).compile()
}

struct Compiler<'source> {
    source: &'source str,
    instrs: Vec<Instr>,
    fragments: Vec<String>,
    vars: Vec<String>,
    includes: Vec<String>,
    /// Placeholder jumps awaiting their target, innermost block last.
    fixups: Vec<(usize, Span)>,
}

/// A successfully matched command body.
enum Command<'source> {
    End,
    Substitute(&'source str),
    If(&'source str),
    For(&'source str, &'source str),
    Include(&'source str),
}

impl<'source> Compiler<'source> {
    fn new(source: &'source str) -> Self {
        Self {
            source,
            instrs: Vec::new(),
            fragments: Vec::new(),
            vars: Vec::new(),
            includes: Vec::new(),
            fixups: Vec::new(),
        }
    }

    fn compile(mut self) -> Result<Program> {
        let bytes = self.source.as_bytes();
        let mut processed = 0;

        while processed < self.source.len() {
            let start = match self.source[processed..].find("$(") {
                Some(i) => processed + i,
                None => {
                    let tail = &self.source[processed..];
                    self.copy_fragment(tail.to_owned(), processed)?;
                    break;
                }
            };

            // A backslash escapes the command introducer and a second
            // backslash un-escapes it again. When the introducer sits at the
            // very start of the source there is no preceding character and
            // therefore no escape.
            if start >= 1 && bytes[start - 1] == b'\\' {
                if start >= 2 && bytes[start - 2] == b'\\' {
                    // `\\$(` collapses to `\` followed by a live command.
                    let text = self.source[processed..start - 1].to_owned();
                    self.copy_fragment(text, processed)?;
                    processed = start;
                } else {
                    // `\$(` emits a literal `$`; the `(` and everything after
                    // it is handled as plain text by the next iteration.
                    let mut text = self.source[processed..start - 1].to_owned();
                    text.push('$');
                    self.copy_fragment(text, processed)?;
                    processed = start + 1;
                    continue;
                }
            }

            if start > processed {
                let text = self.source[processed..start].to_owned();
                self.copy_fragment(text, processed)?;
            }

            let (command, len) = self.command(start)?;
            let span = Span::from(start..start + 2 + len);

            match command {
                Command::End => {
                    self.close_block(span)?;
                }
                Command::Substitute(name) => {
                    let idx = self.add_variable(name, span)?;
                    self.instrs.push(Instr::new(Opcode::Substitute, idx));
                }
                Command::If(name) => {
                    let idx = self.add_variable(name, span)?;
                    self.instrs.push(Instr::new(Opcode::Immediate, idx));
                    self.fixups.push((self.instrs.len(), span));
                    self.instrs.push(Instr::new(Opcode::FalseJump, 0));
                }
                Command::For(item, list) => {
                    let item_idx = self.add_variable(item, span)?;
                    let list_idx = self.add_variable(list, span)?;
                    self.instrs.push(Instr::new(Opcode::Immediate, item_idx));
                    self.instrs.push(Instr::new(Opcode::Immediate, list_idx));
                    self.fixups.push((self.instrs.len(), span));
                    self.instrs.push(Instr::new(Opcode::ListEndJump, 0));
                }
                Command::Include(target) => {
                    let idx = self.add_include(target, span)?;
                    self.instrs.push(Instr::new(Opcode::Include, idx));
                }
            }

            processed = start + 2 + len;
        }

        if let Some((_, span)) = self.fixups.first() {
            return Err(Error::compile("unclosed block", self.source, *span));
        }

        self.instrs.push(Instr::new(Opcode::Halt, 0));

        Ok(Program {
            instrs: self.instrs,
            fragments: self.fragments,
            vars: self.vars,
            includes: self.includes,
        })
    }

    /// Matches the command body that begins after the `$(` at `start`.
    ///
    /// Patterns are tried in order: `end`, substitution, `if`, `for`,
    /// `include`; the first match wins. Returns the command and the number of
    /// bytes it consumed after the introducer.
    fn command(&self, start: usize) -> Result<(Command<'source>, usize)> {
        let rest = &self.source[start + 2..];

        if rest.starts_with("end)") {
            return Ok((Command::End, 4));
        }
        if let Some((name, len)) = match_substitute(rest) {
            return Ok((Command::Substitute(name), len));
        }
        if let Some((name, len)) = match_if(rest) {
            return Ok((Command::If(name), len));
        }
        if let Some((item, list, len)) = match_for(rest) {
            return Ok((Command::For(item, list), len));
        }
        if let Some((target, len)) = match_include(rest) {
            return Ok((Command::Include(target), len));
        }

        let n = match rest.find(')') {
            Some(i) => start + 2 + i + 1,
            None => self.source.len(),
        };
        Err(Error::compile("unrecognized command", self.source, start..n))
    }

    /// Closes the innermost open block, patching its placeholder jump to the
    /// next instruction index.
    fn close_block(&mut self, span: Span) -> Result<()> {
        let (head, _) = self
            .fixups
            .pop()
            .ok_or_else(|| Error::compile("unexpected `end`", self.source, span))?;

        let is_loop = self.instrs[head].opcode() == Some(Opcode::ListEndJump);
        let target = self.instrs.len() + is_loop as usize;
        if target > MAX_OPERAND as usize {
            return Err(Error::compile("template too large", self.source, span));
        }
        if is_loop {
            // Loop bodies return to the head so the cursor can advance again.
            self.instrs.push(Instr::new(Opcode::Jump, head as u16));
        }
        self.instrs[head] = self.instrs[head].with_operand(target as u16);
        Ok(())
    }

    fn copy_fragment(&mut self, text: String, at: usize) -> Result<()> {
        if self.fragments.len() > MAX_OPERAND as usize {
            return Err(Error::compile("too many fragments", self.source, at..at));
        }
        self.fragments.push(text);
        let idx = (self.fragments.len() - 1) as u16;
        self.instrs.push(Instr::new(Opcode::Copy, idx));
        Ok(())
    }

    /// Interns a variable name, returning the existing index if it has been
    /// seen before.
    fn add_variable(&mut self, name: &str, span: Span) -> Result<u16> {
        if let Some(idx) = self.vars.iter().position(|v| v == name) {
            return Ok(idx as u16);
        }
        if self.vars.len() > MAX_OPERAND as usize {
            return Err(Error::compile("too many variables", self.source, span));
        }
        self.vars.push(name.to_owned());
        Ok((self.vars.len() - 1) as u16)
    }

    fn add_include(&mut self, target: &str, span: Span) -> Result<u16> {
        if self.includes.len() > MAX_OPERAND as usize {
            return Err(Error::compile("too many includes", self.source, span));
        }
        self.includes.push(target.to_owned());
        Ok((self.includes.len() - 1) as u16)
    }
}

/// `IDENT ")"`
fn match_substitute(rest: &str) -> Option<(&str, usize)> {
    let n = ident_len(rest);
    if n > 0 && rest[n..].starts_with(')') {
        Some((&rest[..n], n + 1))
    } else {
        None
    }
}

/// `"if" WS+ IDENT ")"`
fn match_if(rest: &str) -> Option<(&str, usize)> {
    let r = rest.strip_prefix("if")?;
    let ws = space_len(r);
    if ws == 0 {
        return None;
    }
    let r = &r[ws..];
    let n = ident_len(r);
    if n > 0 && r[n..].starts_with(')') {
        Some((&r[..n], 2 + ws + n + 1))
    } else {
        None
    }
}

/// `"for" WS+ IDENT WS+ "in" WS+ IDENT ")"`
fn match_for(rest: &str) -> Option<(&str, &str, usize)> {
    let r = rest.strip_prefix("for")?;
    let ws1 = space_len(r);
    if ws1 == 0 {
        return None;
    }
    let r = &r[ws1..];
    let item_len = ident_len(r);
    if item_len == 0 {
        return None;
    }
    let (item, r) = r.split_at(item_len);
    let ws2 = space_len(r);
    if ws2 == 0 {
        return None;
    }
    let r = r[ws2..].strip_prefix("in")?;
    let ws3 = space_len(r);
    if ws3 == 0 {
        return None;
    }
    let r = &r[ws3..];
    let n = ident_len(r);
    if n > 0 && r[n..].starts_with(')') {
        let len = 3 + ws1 + item_len + ws2 + 2 + ws3 + n + 1;
        Some((item, &r[..n], len))
    } else {
        None
    }
}

/// `"include" " " <anything but ")">+ ")"`
fn match_include(rest: &str) -> Option<(&str, usize)> {
    let r = rest.strip_prefix("include ")?;
    let end = r.find(')')?;
    if end == 0 {
        return None;
    }
    Some((&r[..end], 8 + end + 1))
}

/// Length of the leading `[A-Za-z_][A-Za-z0-9_]*` prefix, or zero.
fn ident_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
        _ => 0,
    }
}

/// Length of the leading run of spaces and tabs.
fn space_len(s: &str) -> usize {
    s.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}
