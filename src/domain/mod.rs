// Domain layer - Zones, count snapshots and chart series
pub mod chart;
pub mod counts;
pub mod zone;
