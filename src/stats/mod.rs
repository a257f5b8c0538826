//! Stats module - summaries and association tests

mod calculator;

pub use calculator::{
    ActivitySummary, HrvRecoveryAssociation, MetricsSummary, MonthlySummary, StatsCalculator,
};
