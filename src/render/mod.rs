//! Executes a compiled [`Program`] against a binding of named values.

mod iter;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::render::iter::IterState;
use crate::types::program::{Opcode, Program};
use crate::value::Value;
use crate::{Error, Result};

/// Resolves an include target and appends its output. Failed includes must
/// append nothing.
pub type IncludeFn<'a> = dyn Fn(&str, &mut String) + 'a;

/// Render a program with no include resolution; includes emit nothing.
pub fn template(program: &Program, globals: &Value) -> Result<String> {
    Renderer::new(program, globals, None).render()
}

/// Render a program, resolving includes through the given callback.
pub fn template_with(
    program: &Program,
    globals: &Value,
    include: &IncludeFn<'_>,
) -> Result<String> {
    Renderer::new(program, globals, Some(include)).render()
}

struct Renderer<'render> {
    program: &'render Program,
    globals: &'render Value,
    include: Option<&'render IncludeFn<'render>>,
    /// Active loops, keyed by the loop variable index.
    iters: BTreeMap<u16, IterState<'render>>,
}

impl<'render> Renderer<'render> {
    fn new(
        program: &'render Program,
        globals: &'render Value,
        include: Option<&'render IncludeFn<'render>>,
    ) -> Self {
        Self {
            program,
            globals,
            include,
            iters: BTreeMap::new(),
        }
    }

    fn render(mut self) -> Result<String> {
        let mut out = String::new();
        let mut pc = 0;

        while pc < self.program.instrs.len() {
            let instr = self.program.instrs[pc];
            let operand = instr.operand() as usize;

            match instr.opcode() {
                Some(Opcode::Halt) => break,

                Some(Opcode::Copy) => {
                    out.push_str(&self.program.fragments[operand]);
                }

                Some(Opcode::Substitute) => {
                    self.emit(instr.operand(), &mut out);
                }

                // The operand is read by the following control op.
                Some(Opcode::Immediate) => {}

                Some(Opcode::FalseJump) => {
                    let var = self.program.instrs[pc - 1].operand();
                    if !self.exists(var) {
                        pc = operand;
                        continue;
                    }
                }

                Some(Opcode::ListEndJump) => {
                    let item = self.program.instrs[pc - 2].operand();
                    let list = self.program.instrs[pc - 1].operand();
                    if !self.advance(item, list) {
                        pc = operand;
                        continue;
                    }
                }

                Some(Opcode::Jump) => {
                    pc = operand;
                    continue;
                }

                Some(Opcode::Include) => {
                    if let Some(include) = self.include {
                        include(&self.program.includes[operand], &mut out);
                    }
                }

                None => {
                    return Err(Error::invalid(
                        "unrecognized instruction encountered in template program",
                    ));
                }
            }

            pc += 1;
        }

        Ok(out)
    }

    /// Appends the current value of a variable, preferring an active loop
    /// item over the binding entry. Unbound names append nothing.
    fn emit(&self, var: u16, out: &mut String) {
        if let Some(state) = self.iters.get(&var) {
            state.current().render_to(out);
        } else if let Some(value) = self.lookup(var) {
            value.render_to(out);
        }
    }

    fn exists(&self, var: u16) -> bool {
        self.iters.contains_key(&var) || self.lookup(var).is_some()
    }

    /// Binds the next element of the container to the loop item, starting the
    /// iteration on first entry. Returns `false` when the container is
    /// missing, not iterable, empty, or exhausted; exhaustion also clears the
    /// loop item.
    fn advance(&mut self, item: u16, list: u16) -> bool {
        let items = match self.lookup(list) {
            Some(Value::List(items)) => items,
            _ => return false,
        };

        match self.iters.entry(item) {
            Entry::Vacant(entry) => match IterState::new(items) {
                Some(state) => {
                    entry.insert(state);
                    true
                }
                None => false,
            },
            Entry::Occupied(mut entry) => {
                if entry.get_mut().advance() {
                    true
                } else {
                    entry.remove();
                    false
                }
            }
        }
    }

    fn lookup(&self, var: u16) -> Option<&'render Value> {
        match self.globals {
            Value::Map(map) => map.get(&self.program.vars[var as usize]),
            _ => None,
        }
    }
}
