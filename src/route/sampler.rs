//! Route point sampling
//!
//! Forecast lookups are one request per point, so dense tracks are thinned to
//! a small, evenly spaced subset that always keeps the start and the finish.

use super::RouteError;

/// Reduce `points` to at most `target_count` evenly spaced points.
///
/// Inputs that already fit are returned unchanged. Otherwise the first and
/// last points are kept and interior points are taken every
/// `floor((len - 1) / (target_count - 1))` positions. When that walk yields
/// more than `target_count - 2` interior points, only the first ones are
/// kept, so the selection leans toward the start of the route.
pub fn sample<T: Clone>(points: &[T], target_count: usize) -> Result<Vec<T>, RouteError> {
    if points.len() <= target_count {
        return Ok(points.to_vec());
    }
    if target_count < 2 {
        return Err(RouteError::InvalidSampleTarget {
            target: target_count,
        });
    }

    let last = points.len() - 1;
    let step = last / (target_count - 1);

    let mut sampled = Vec::with_capacity(target_count);
    sampled.push(points[0].clone());
    // Small steps can visit more interior points than fit; the cap keeps the bound.
    sampled.extend(
        (step..=last - step)
            .step_by(step)
            .take(target_count - 2)
            .map(|i| points[i].clone()),
    );
    sampled.push(points[last].clone());

    Ok(sampled)
}
