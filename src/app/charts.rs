// StashScope - app/charts.rs
//
// Chart lifecycle. Each chart is rendered from freshly aggregated series and
// identified by a handle; the controller disposes every live handle before
// rendering the next generation, so no stale series survive a refilter.

use crate::core::aggregate;
use crate::core::model::{ChartData, Record};

/// The four derived visualisations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Stacked bars per date, one stack segment per league.
    Timeline,
    /// Horizontal bars of action frequency.
    Actions,
    /// Pie of records per account.
    Accounts,
    /// Stacked bars per day, one segment per hour of day.
    Hourly,
}

impl ChartKind {
    pub fn all() -> &'static [ChartKind] {
        &[
            ChartKind::Timeline,
            ChartKind::Actions,
            ChartKind::Accounts,
            ChartKind::Hourly,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Timeline => "Timeline by League",
            ChartKind::Actions => "Action Frequency",
            ChartKind::Accounts => "Account Distribution",
            ChartKind::Hourly => "Hourly Activity",
        }
    }

    /// Run this chart's aggregator.
    pub fn aggregate<'a, I>(&self, records: I) -> ChartData
    where
        I: IntoIterator<Item = &'a Record>,
    {
        match self {
            ChartKind::Timeline => aggregate::timeline(records),
            ChartKind::Actions => aggregate::by_action(records),
            ChartKind::Accounts => aggregate::by_account(records),
            ChartKind::Hourly => aggregate::hourly(records),
        }
    }
}

/// Opaque identifier of one rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle {
    kind: ChartKind,
    id: u64,
}

impl ChartHandle {
    pub fn kind(&self) -> ChartKind {
        self.kind
    }
}

#[derive(Debug)]
struct RenderedChart {
    handle: ChartHandle,
    data: ChartData,
}

/// The live charts, at most one per kind.
#[derive(Debug, Default)]
pub struct ChartSet {
    live: Vec<RenderedChart>,
    next_id: u64,
}

impl ChartSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `data` as the chart of `kind` and return its handle.
    ///
    /// Any chart of the same kind still live is replaced, so rendering the
    /// same series twice leaves one chart showing that series.
    pub fn render(&mut self, kind: ChartKind, data: ChartData) -> ChartHandle {
        self.live.retain(|c| c.handle.kind != kind);
        let handle = ChartHandle {
            kind,
            id: self.next_id,
        };
        self.next_id += 1;
        tracing::trace!(?kind, id = handle.id, labels = data.labels.len(), "Chart rendered");
        self.live.push(RenderedChart { handle, data });
        handle
    }

    /// Release a chart. Disposing an unknown or already-disposed handle is a
    /// no-op; returns whether a chart was removed.
    pub fn dispose(&mut self, handle: ChartHandle) -> bool {
        let before = self.live.len();
        self.live.retain(|c| c.handle != handle);
        before != self.live.len()
    }

    /// Handles of every live chart.
    pub fn handles(&self) -> Vec<ChartHandle> {
        self.live.iter().map(|c| c.handle).collect()
    }

    /// Dispose all live charts, then render every kind from `records`.
    pub fn rebuild(&mut self, records: &[&Record]) {
        for handle in self.handles() {
            self.dispose(handle);
        }
        for kind in ChartKind::all() {
            let data = kind.aggregate(records.iter().copied());
            self.render(*kind, data);
        }
    }

    /// Series of the live chart of `kind`, if one has been rendered.
    pub fn get(&self, kind: ChartKind) -> Option<&ChartData> {
        self.live
            .iter()
            .find(|c| c.handle.kind == kind)
            .map(|c| &c.data)
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
