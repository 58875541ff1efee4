//! Worker core-count determination (spec.md §4.7 step 2: "`cores` is
//! `min(configured_max, physical_cores)`, or `physical_cores` when
//! configured is 0").

/// Resolve how many cores a worker should report and use this iteration.
#[must_use]
pub fn determine_worker_cores(configured_max: u32, physical_cores: u32) -> u32 {
    if configured_max == 0 {
        physical_cores
    } else {
        configured_max.min(physical_cores)
    }
}

/// The machine's physical core count, as reported by `num_cpus`, clamped
/// to fit `u32` (always true in practice).
#[must_use]
pub fn physical_core_count() -> u32 {
    u32::try_from(num_cpus::get_physical()).unwrap_or(1)
}
