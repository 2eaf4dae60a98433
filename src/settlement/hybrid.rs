use crate::resources::Resources;

/// Pooled gain: everything recycled minus everything lost.
pub fn pooled_gain(losses: &[Resources], recycled: &[Resources]) -> Resources {
    recycled.iter().copied().sum::<Resources>() - losses.iter().copied().sum::<Resources>()
}

/// Signed due per player: `gain × share + loss − recycled`, positive when the
/// player is owed resources.
///
/// The three slices are indexed by player and must have the same length.
pub fn hybrid_due(losses: &[Resources], recycled: &[Resources], shares: &[f64]) -> Vec<Resources> {
    debug_assert!(losses.len() == recycled.len() && losses.len() == shares.len());
    let gain = pooled_gain(losses, recycled);
    losses
        .iter()
        .zip(recycled)
        .zip(shares)
        .map(|((loss, got), share)| gain * *share + *loss - *got)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_pays_out_the_loser_and_splits_the_rest() {
        let losses = [Resources::new(1_000.0, 0.0, 0.0), Resources::ZERO];
        let recycled = [Resources::ZERO, Resources::new(3_000.0, 600.0, 0.0)];
        let due = hybrid_due(&losses, &recycled, &[0.5, 0.5]);
        assert_eq!(due[0], Resources::new(2_000.0, 300.0, 0.0));
        assert_eq!(due[1], Resources::new(-2_000.0, -300.0, 0.0));
    }

    #[test]
    fn dues_sum_to_zero_when_shares_sum_to_one() {
        let losses = [
            Resources::new(500.0, 100.0, 10.0),
            Resources::new(50.0, 0.0, 0.0),
            Resources::new(0.0, 900.0, 30.0),
        ];
        let recycled = [Resources::new(2_000.0, 0.0, 0.0), Resources::ZERO, Resources::new(0.0, 700.0, 5.0)];
        let due = hybrid_due(&losses, &recycled, &[0.2, 0.3, 0.5]);
        let total: Resources = due.iter().copied().sum();
        assert!(total.metal.abs() < 1e-9);
        assert!(total.crystal.abs() < 1e-9);
        assert!(total.deuterium.abs() < 1e-9);
    }

    #[test]
    fn zero_shares_leave_loss_minus_recycled() {
        let losses = [Resources::new(100.0, 0.0, 0.0)];
        let recycled = [Resources::new(40.0, 0.0, 0.0)];
        assert_eq!(hybrid_due(&losses, &recycled, &[0.0]), vec![Resources::new(60.0, 0.0, 0.0)]);
    }
}
