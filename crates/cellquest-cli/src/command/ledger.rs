use std::path::PathBuf;

use cellquest_engine::FactionMap;
use cellquest_training::{
    arena::Arena,
    ledger::{Ledger, LedgerRecord},
    store::FileStore,
};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::Output;

use super::client_result;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LedgerArg {
    /// Number of rows to show per ledger, head first
    #[arg(long, default_value_t = 5)]
    limit: usize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct LedgerView {
    len: usize,
    rows: Vec<String>,
}

impl LedgerView {
    fn new<R>(ledger: &Ledger<R>, limit: usize) -> Self
    where
        R: LedgerRecord,
    {
        Self {
            len: ledger.len(),
            rows: ledger
                .records()
                .iter()
                .take(limit)
                .map(LedgerRecord::to_row)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BookView {
    params: LedgerView,
    factions: FactionMap<LedgerView>,
}

pub(crate) fn run(arena: &Arena<FileStore, Pcg32>, arg: &LedgerArg) -> anyhow::Result<()> {
    let book = client_result(arena.ledger_book())?;
    let view = BookView {
        params: LedgerView::new(&book.params, arg.limit),
        factions: book.factions.map(|_, ledger| LedgerView::new(ledger, arg.limit)),
    };
    Output::save_json(&view, arg.output.as_deref())
}
