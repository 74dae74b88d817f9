//! Display Lists
//!
//! A list is a recorded `Vec<Op>`. `new_list` opens a recorder; every call
//! issued while it is open is appended (and also executed in
//! compile-and-execute mode). `call_list` replays through the same dispatch
//! path as live calls, with a recursion cap for self-referencing lists.

use super::op::Op;
use super::Context;

const MAX_CALL_DEPTH: u32 = 64;

#[derive(Debug)]
pub(crate) struct ListRecorder {
    pub id: u32,
    pub execute: bool,
    pub ops: Vec<Op>,
}

impl Context {
    /// Reserve a contiguous range of `n` list ids; returns the first
    pub fn gen_lists(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        let base = self.next_list_id;
        self.next_list_id += n;
        for id in base..base + n {
            self.lists.insert(id, Vec::new());
        }
        base
    }

    /// Open a recorder. `execute` selects compile-and-execute mode.
    pub fn new_list(&mut self, id: u32, execute: bool) {
        assert!(id != 0, "list id 0 is reserved");
        assert!(
            self.compiling.is_none(),
            "new_list while another list is being compiled"
        );
        self.compiling = Some(ListRecorder {
            id,
            execute,
            ops: Vec::new(),
        });
    }

    pub fn end_list(&mut self) {
        let rec = self
            .compiling
            .take()
            .expect("end_list without a matching new_list");
        self.lists.insert(rec.id, rec.ops);
    }

    pub fn is_list(&self, id: u32) -> bool {
        self.lists.contains_key(&id)
    }

    pub fn delete_lists(&mut self, base: u32, n: u32) {
        for id in base..base.saturating_add(n) {
            self.lists.remove(&id);
        }
    }

    /// Replay a compiled list
    pub fn call_list(&mut self, id: u32) {
        self.issue(Op::CallList(id));
    }

    pub(crate) fn exec_call_list(&mut self, id: u32) {
        if self.call_depth >= MAX_CALL_DEPTH {
            tracing::warn!(id, "call_list recursion limit reached");
            return;
        }
        let Some(ops) = self.lists.get(&id) else {
            tracing::warn!(id, "call_list: unknown list");
            return;
        };
        let ops = ops.clone();
        self.call_depth += 1;
        for op in ops {
            self.exec(op);
        }
        self.call_depth -= 1;
    }
}
