//! Scripted launcher for deterministic scheduler tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use super::{Exit, Launcher, Running};

#[derive(Debug, Default)]
pub(crate) struct ScriptState {
    /// Commands in launch order.
    pub launched: Vec<Vec<String>>,
    pub running: usize,
    pub max_running: usize,
    /// Exit per program name; missing programs exit 0 with empty output.
    pub exits: HashMap<String, Exit>,
    /// Polls a process stays running before it exits.
    pub polls_to_exit: usize,
}

/// Clones share state, so a test keeps one handle while the manager owns another.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedLauncher {
    pub state: Rc<RefCell<ScriptState>>,
}

impl ScriptedLauncher {
    pub fn new(polls_to_exit: usize) -> Self {
        let launcher = Self::default();
        launcher.state.borrow_mut().polls_to_exit = polls_to_exit;
        launcher
    }

    pub fn exit_with(&self, program: &str, exit: Exit) {
        self.state
            .borrow_mut()
            .exits
            .insert(program.to_string(), exit);
    }

    pub fn launched_programs(&self) -> Vec<String> {
        self.state
            .borrow()
            .launched
            .iter()
            .map(|c| c.first().cloned().unwrap_or_default())
            .collect()
    }

    pub fn max_running(&self) -> usize {
        self.state.borrow().max_running
    }
}

impl Launcher for ScriptedLauncher {
    fn launch(&mut self, command: &[String]) -> io::Result<Box<dyn Running>> {
        let mut state = self.state.borrow_mut();
        state.launched.push(command.to_vec());
        state.running += 1;
        state.max_running = state.max_running.max(state.running);
        let program = command.first().cloned().unwrap_or_default();
        let exit = state.exits.get(&program).cloned().unwrap_or(Exit {
            code: Some(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        });
        Ok(Box::new(ScriptedProcess {
            state: Rc::clone(&self.state),
            polls_left: state.polls_to_exit,
            exit,
        }))
    }
}

struct ScriptedProcess {
    state: Rc<RefCell<ScriptState>>,
    polls_left: usize,
    exit: Exit,
}

impl Running for ScriptedProcess {
    fn poll(&mut self) -> io::Result<Option<Exit>> {
        if self.polls_left > 0 {
            self.polls_left -= 1;
            return Ok(None);
        }
        self.state.borrow_mut().running -= 1;
        Ok(Some(self.exit.clone()))
    }
}
