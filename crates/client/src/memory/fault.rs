//! Deterministic fault injection for the reference store

use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::error::{ClientError, ClientResult};

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `Connector::connect`
    Connect,
    /// `Connection::table_names`
    ListTables,
    /// `Connection::create_table`
    CreateTable,
    /// `Connection::drop_table`
    DropTable,
    /// `Connection::open_table`
    OpenTable,
    /// `Table::add`
    Add,
    /// `Table::create_index`
    CreateIndex,
    /// `Table::search`
    Search,
}

/// Queue of armed faults, consumed first-in first-out per operation
#[derive(Debug, Default)]
pub struct FaultInjector {
    armed: Mutex<VecDeque<(Operation, String)>>,
}

impl FaultInjector {
    /// Make the next call of `operation` fail with `message`
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.armed.lock().push_back((operation, message.into()));
    }

    /// Consume an armed fault for `operation`, if any
    pub fn check(&self, operation: Operation) -> ClientResult<()> {
        let mut armed = self.armed.lock();
        match armed.iter().position(|(op, _)| *op == operation) {
            Some(idx) => {
                let (operation, message) = armed.remove(idx).ok_or_else(|| {
                    ClientError::Internal("armed fault vanished".to_string())
                })?;
                Err(ClientError::Injected { operation, message })
            }
            None => Ok(()),
        }
    }

    /// Number of faults not yet triggered
    pub fn pending(&self) -> usize {
        self.armed.lock().len()
    }
}
