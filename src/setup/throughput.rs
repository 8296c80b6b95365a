//! Throughput reconciliation planning.
//!
//! Pure decision logic for startup throughput reconciliation: given a
//! collection's configured target and the throughput currently attached to
//! it, decide whether to issue a replace. The provisioner executes the
//! decision; the store is never touched from here.

use crate::config::DocumentOptions;

/// Smallest manual throughput the store accepts.
pub const MIN_MANUAL_THROUGHPUT: usize = 400;

/// Smallest autoscale maximum the store accepts.
pub const MIN_AUTOSCALE_MAX_THROUGHPUT: usize = 4000;

/// Snapshot of the throughput currently attached to a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentThroughput {
    /// Manual RU/s, when the collection is in manual mode.
    pub manual: Option<usize>,
    /// Autoscale maximum RU/s, when the collection is in autoscale mode.
    pub autoscale_max: Option<usize>,
    /// Whether a rescale is already in progress store-side.
    pub replace_pending: bool,
}

/// Target of a replace-throughput request. Modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputTarget {
    /// Fixed capacity in RU/s.
    Manual(usize),
    /// Autoscale with the given maximum RU/s.
    AutoscaleMax(usize),
}

/// Outcome of planning one collection's reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThroughputDecision {
    /// No replace should be issued.
    Skip(SkipReason),
    /// Issue a single replace-throughput request with this target.
    Replace(ThroughputTarget),
}

/// Why reconciliation was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Startup reconciliation is disabled for this collection.
    NotRequested,
    /// A rescale is already in progress; a concurrent replace would conflict.
    ReplacePending,
    /// Current mode and value already equal the target.
    AlreadyAtTarget,
}

/// Compute the target for a collection, clamped to the mode's floor so the
/// system never requests below the store's minimum.
pub fn target_for(options: &DocumentOptions) -> ThroughputTarget {
    if options.enable_auto_scale {
        ThroughputTarget::AutoscaleMax(options.offered_throughput.max(MIN_AUTOSCALE_MAX_THROUGHPUT))
    } else {
        ThroughputTarget::Manual(options.offered_throughput.max(MIN_MANUAL_THROUGHPUT))
    }
}

/// Decide whether a collection's throughput needs a replace.
pub fn plan(options: &DocumentOptions, current: &CurrentThroughput) -> ThroughputDecision {
    if !options.set_throughput_on_startup {
        return ThroughputDecision::Skip(SkipReason::NotRequested);
    }

    if current.replace_pending {
        return ThroughputDecision::Skip(SkipReason::ReplacePending);
    }

    let target = target_for(options);
    let at_target = match target {
        ThroughputTarget::Manual(value) => current.manual == Some(value),
        ThroughputTarget::AutoscaleMax(value) => current.autoscale_max == Some(value),
    };

    if at_target {
        ThroughputDecision::Skip(SkipReason::AlreadyAtTarget)
    } else {
        ThroughputDecision::Replace(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(offered: usize, auto_scale: bool) -> DocumentOptions {
        DocumentOptions {
            name: "profiles".to_string(),
            time_to_live_days: -1,
            partition_key_name: "tenant".to_string(),
            document_schema: "profile".to_string(),
            offered_throughput: offered,
            set_throughput_on_startup: true,
            enable_auto_scale: auto_scale,
        }
    }

    #[test]
    fn manual_target_is_clamped_to_floor() {
        assert_eq!(
            target_for(&options(100, false)),
            ThroughputTarget::Manual(MIN_MANUAL_THROUGHPUT)
        );
        assert_eq!(target_for(&options(700, false)), ThroughputTarget::Manual(700));
    }

    #[test]
    fn autoscale_target_is_clamped_to_floor() {
        assert_eq!(
            target_for(&options(1000, true)),
            ThroughputTarget::AutoscaleMax(MIN_AUTOSCALE_MAX_THROUGHPUT)
        );
        assert_eq!(
            target_for(&options(8000, true)),
            ThroughputTarget::AutoscaleMax(8000)
        );
    }

    #[test]
    fn skips_when_not_requested() {
        let mut opts = options(700, false);
        opts.set_throughput_on_startup = false;
        let decision = plan(&opts, &CurrentThroughput::default());
        assert_eq!(decision, ThroughputDecision::Skip(SkipReason::NotRequested));
    }

    #[test]
    fn skips_when_replace_is_pending() {
        let current = CurrentThroughput {
            manual: Some(400),
            autoscale_max: None,
            replace_pending: true,
        };
        let decision = plan(&options(700, false), &current);
        assert_eq!(decision, ThroughputDecision::Skip(SkipReason::ReplacePending));
    }

    #[test]
    fn skips_when_already_at_target() {
        let current = CurrentThroughput {
            manual: Some(700),
            ..Default::default()
        };
        let decision = plan(&options(700, false), &current);
        assert_eq!(decision, ThroughputDecision::Skip(SkipReason::AlreadyAtTarget));
    }

    #[test]
    fn mode_change_forces_replace_even_when_values_match() {
        // Collection is manual at 4000, target is autoscale max 4000.
        let current = CurrentThroughput {
            manual: Some(4000),
            ..Default::default()
        };
        let decision = plan(&options(4000, true), &current);
        assert_eq!(
            decision,
            ThroughputDecision::Replace(ThroughputTarget::AutoscaleMax(4000))
        );
    }

    #[test]
    fn replaces_when_value_differs() {
        let current = CurrentThroughput {
            manual: Some(400),
            ..Default::default()
        };
        let decision = plan(&options(700, false), &current);
        assert_eq!(
            decision,
            ThroughputDecision::Replace(ThroughputTarget::Manual(700))
        );
    }
}
