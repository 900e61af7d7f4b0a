use everbook_types::{Entry, SenderId};

use crate::error::LedgerError;
use crate::records::AppendReceipt;

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Append an entry on behalf of `caller`.
    ///
    /// The ledger binds `sender` to `caller` and assigns the acceptance
    /// timestamp itself; neither is caller-suppliable. Returns only once
    /// the append is durably committed. On rejection the sequence is left
    /// untouched.
    fn append(
        &self,
        caller: &SenderId,
        name: &str,
        message: &str,
    ) -> Result<AppendReceipt, LedgerError>;
}

/// Read boundary for ledger queries.
pub trait LedgerReader: Send + Sync {
    /// The full current sequence in acceptance order. Side-effect free.
    ///
    /// Cost grows linearly with total history size; acceptable because the
    /// domain assumes modest entry counts. `read_window` exists as the
    /// escape hatch for larger histories.
    fn read_all(&self) -> Result<Vec<Entry>, LedgerError>;

    /// A window of the sequence starting at `offset` (0-based, acceptance
    /// order), at most `limit` entries. A window past the end is empty.
    fn read_window(&self, offset: u64, limit: u64) -> Result<Vec<Entry>, LedgerError>;

    /// Number of accepted entries.
    fn entry_count(&self) -> Result<u64, LedgerError>;
}
