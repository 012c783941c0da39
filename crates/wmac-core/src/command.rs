// ── Remote command vocabulary ──
//
// Everything sent to the terminal goes through `RemoteCommand`, which
// renders the exact text line typed at the prompt.

use std::fmt;

use crate::model::{FilterIndex, MacAddress};

/// A line of text typed into the terminal's shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// `display wifi filter`
    ListFilter,
    /// `add wifi filter index <N> mac <addr>`
    Admit { index: FilterIndex, mac: MacAddress },
    /// `del wifi filter index <N> mac <addr>`
    Revoke { index: FilterIndex, mac: MacAddress },
    /// Anything else, passed through verbatim.
    Raw(String),
}

impl RemoteCommand {
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListFilter => f.write_str("display wifi filter"),
            Self::Admit { index, mac } => {
                write!(f, "add wifi filter index {} mac {mac}", index.number())
            }
            Self::Revoke { index, mac } => {
                write!(f, "del wifi filter index {} mac {mac}", index.number())
            }
            Self::Raw(line) => f.write_str(line),
        }
    }
}
