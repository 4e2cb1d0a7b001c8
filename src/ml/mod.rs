/*!
 * # Prediction Routines
 *
 * The three independent routines behind the SmartFlow API:
 *
 * - [`forecasting`] fits an additive trend/seasonality model to a weekly
 *   sales series and extends it a fixed number of periods into the future.
 * - [`stockout`] scores a four-feature economic vector against a pre-trained
 *   decision-tree ensemble loaded once from disk.
 * - [`clustering`] partitions delivery coordinates into a fixed number of
 *   groups with seeded k-means.
 *
 * The routines do not depend on one another and hold no mutable state; the
 * only shared resource is the read-only classifier artifact.
 */

pub mod clustering;
pub mod forecasting;
pub mod stockout;
