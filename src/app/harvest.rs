use std::collections::{BTreeSet, HashSet};

use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    api::{CapitalGainsDto, HoldingDto},
    app::calc::project,
    models::{CapitalGainsSnapshot, Holding, HoldingId},
};

#[derive(Clone, Debug)]
pub enum HarvestAction {
    LoadHoldings(Vec<HoldingDto>),
    LoadBaseline(CapitalGainsDto),
    ToggleSelection(HoldingId),
    SelectAll,
    ClearSelection,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

#[derive(Clone, Copy, Debug, Eq, Getters, PartialEq, new)]
pub struct HarvestSummary {
    pre_net: Decimal,
    post_net: Decimal,
    savings: Option<Decimal>,
}

/// Holdings, the user's selection and the two capital gains snapshots.
///
/// `projected` is only ever written together with the inputs it was derived
/// from, so it always equals `project(baseline, holdings, selection)`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HarvestState {
    holdings: Vec<Holding>,
    selection: BTreeSet<HoldingId>,
    baseline: CapitalGainsSnapshot,
    projected: CapitalGainsSnapshot,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: HarvestAction) {
        *self = std::mem::take(self).reduce(action);
    }

    pub fn reduce(self, action: HarvestAction) -> Self {
        match action {
            HarvestAction::LoadHoldings(inputs) => {
                let holdings = assign_ids(inputs);
                info!(count = holdings.len(), "holdings loaded, selection cleared");
                Self::derive(holdings, BTreeSet::new(), self.baseline)
            }
            HarvestAction::LoadBaseline(gains) => {
                let baseline = gains.to_snapshot();
                debug!(?baseline, "baseline capital gains loaded");
                Self::derive(self.holdings, self.selection, baseline)
            }
            HarvestAction::ToggleSelection(id) => {
                if !self.holdings.iter().any(|h| h.id() == &id) {
                    warn!(%id, "ignoring toggle for unknown holding");
                    return self;
                }

                let mut selection = self.selection;
                if !selection.remove(&id) {
                    selection.insert(id);
                }
                Self::derive(self.holdings, selection, self.baseline)
            }
            HarvestAction::SelectAll => {
                let selection = self.holdings.iter().map(|h| h.id().clone()).collect();
                Self::derive(self.holdings, selection, self.baseline)
            }
            HarvestAction::ClearSelection => Self {
                projected: self.baseline,
                selection: BTreeSet::new(),
                ..self
            },
        }
    }

    fn derive(
        holdings: Vec<Holding>,
        selection: BTreeSet<HoldingId>,
        baseline: CapitalGainsSnapshot,
    ) -> Self {
        let projected = project(&baseline, &holdings, &selection);
        Self {
            holdings,
            selection,
            baseline,
            projected,
        }
    }

    pub fn load_holdings(&mut self, inputs: Vec<HoldingDto>) {
        self.dispatch(HarvestAction::LoadHoldings(inputs));
    }

    pub fn load_baseline(&mut self, gains: CapitalGainsDto) {
        self.dispatch(HarvestAction::LoadBaseline(gains));
    }

    pub fn toggle_selection(&mut self, id: HoldingId) {
        self.dispatch(HarvestAction::ToggleSelection(id));
    }

    pub fn select_all(&mut self) {
        self.dispatch(HarvestAction::SelectAll);
    }

    pub fn clear_selection(&mut self) {
        self.dispatch(HarvestAction::ClearSelection);
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn selection(&self) -> &BTreeSet<HoldingId> {
        &self.selection
    }

    pub fn baseline(&self) -> &CapitalGainsSnapshot {
        &self.baseline
    }

    pub fn projected(&self) -> &CapitalGainsSnapshot {
        &self.projected
    }

    pub fn is_selected(&self, id: &HoldingId) -> bool {
        self.selection.contains(id)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&Holding, bool)> {
        self.holdings
            .iter()
            .map(|holding| (holding, self.is_selected(holding.id())))
    }

    pub fn selection_state(&self) -> SelectionState {
        if self.selection.is_empty() {
            SelectionState::None
        } else if self.selection.len() == self.holdings.len() {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }

    pub fn summary(&self) -> HarvestSummary {
        let pre_net = self.baseline.net();
        let post_net = if self.selection.is_empty() {
            pre_net
        } else {
            self.projected.net()
        };
        let savings = (!self.selection.is_empty() && post_net < pre_net)
            .then(|| pre_net.saturating_sub(post_net));

        HarvestSummary::new(pre_net, post_net, savings)
    }
}

/// Gives every holding a unique id for this load: the upstream `id`, else the
/// coin symbol, else `holding-{index}`. Taken keys get the index appended.
fn assign_ids(inputs: Vec<HoldingDto>) -> Vec<Holding> {
    let mut seen: HashSet<String> = HashSet::with_capacity(inputs.len());

    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            let base = input
                .natural_key()
                .map(str::to_string)
                .unwrap_or_else(|| format!("holding-{}", index));

            let mut candidate = base.clone();
            let mut attempt = 0;
            while seen.contains(&candidate) {
                attempt += 1;
                candidate = if attempt == 1 {
                    format!("{}-{}", base, index)
                } else {
                    format!("{}-{}-{}", base, index, attempt)
                };
            }

            if candidate != base {
                warn!(key = %base, id = %candidate, "duplicate holding key");
            }
            seen.insert(candidate.clone());
            input.to_holding(HoldingId::from(candidate))
        })
        .collect()
}
