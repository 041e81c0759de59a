//! `cronpad-table`: the line-oriented job table model.
//!
//! # Overview
//!
//! Raw table text is classified line by line into a [`line::Table`]. The
//! parser projects task lines into [`types::Entry`] values for clients; the
//! reconciler merges a client-submitted entry set back into fresh table text
//! while leaving every line it does not manage untouched.
//!
//! # Line kinds
//!
//! | Kind             | Example                         | Becomes an entry |
//! |------------------|---------------------------------|------------------|
//! | `Blank`          | ``                              | no               |
//! | `DisabledTask`   | `# 0 3 * * * /bin/backup.sh`    | yes, disabled    |
//! | `ForeignComment` | `# nightly jobs`                | no               |
//! | `EnvAssignment`  | `MAILTO=ops@example.com`        | no               |
//! | `ActiveTask`     | `*/5 * * * * /usr/bin/foo`      | yes, enabled     |
//! | `Unrecognized`   | `@reboot /usr/bin/foo`          | no, reported     |

pub mod error;
pub mod line;
pub mod parse;
pub mod reconcile;
pub mod request;
pub mod types;

pub use error::{Result, TableError};
pub use line::{Line, LineKind, Table};
pub use parse::{parse, ParseOutcome};
pub use reconcile::{reconcile, Reconciled, Reconciler};
pub use request::SaveRequest;
pub use types::{Entry, EntryKey, Task};
