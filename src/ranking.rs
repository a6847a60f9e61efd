//! Percentile lookup against fixed per-game reference tables.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    pub threshold: f64,
    pub percentile: f64,
    pub tier: &'static str,
}

const fn bp(threshold: f64, percentile: f64, tier: &'static str) -> Breakpoint {
    Breakpoint { threshold, percentile, tier }
}

const SKY_DEFENDER: [Breakpoint; 6] = [
    bp(0.0, 10.0, "Cadet"),
    bp(80.0, 30.0, "Private"),
    bp(200.0, 50.0, "Sergeant"),
    bp(400.0, 75.0, "Lieutenant"),
    bp(800.0, 90.0, "Captain"),
    bp(1200.0, 99.0, "Sky Marshal"),
];

const AIM_TRAINER: [Breakpoint; 6] = [
    bp(10.0, 10.0, "Rusty"),
    bp(25.0, 40.0, "Average"),
    bp(40.0, 60.0, "Sharp"),
    bp(55.0, 80.0, "Sniper"),
    bp(70.0, 95.0, "Aimbot"),
    bp(85.0, 99.9, "Human Benzmark"),
];

// Seconds survived
const MOVEMENT_TRAINER: [Breakpoint; 5] = [
    bp(10.0, 20.0, "Walking Target"),
    bp(30.0, 50.0, "Survivor"),
    bp(60.0, 75.0, "Dodger"),
    bp(90.0, 90.0, "Ninja"),
    bp(120.0, 99.0, "Untouchable"),
];

const BELOW_TABLE_PERCENTILE: f64 = 1.0;
const ABOVE_TABLE_PERCENTILE: f64 = 99.9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ranking {
    pub percentile: f64,
    pub tier: &'static str,
}

impl Ranking {
    /// Share of players doing better, e.g. 30.0 for the 70th percentile.
    pub fn top_share(&self) -> f64 {
        round_tenth(100.0 - self.percentile)
    }
}

pub fn table(game_key: &str) -> Option<&'static [Breakpoint]> {
    match game_key {
        "skyDefender" => Some(&SKY_DEFENDER),
        "aimTrainer" => Some(&AIM_TRAINER),
        "movementTrainer" => Some(&MOVEMENT_TRAINER),
        _ => None,
    }
}

/// Interpolates the percentile for `score`; unknown games yield `None`.
pub fn calculate_percentile(game_key: &str, score: f64) -> Option<Ranking> {
    let data = table(game_key)?;
    let (first, last) = (data.first()?, data.last()?);

    if !score.is_finite() || score < first.threshold {
        return Some(Ranking { percentile: BELOW_TABLE_PERCENTILE, tier: first.tier });
    }
    if score >= last.threshold {
        return Some(Ranking { percentile: ABOVE_TABLE_PERCENTILE, tier: last.tier });
    }

    data.windows(2).find_map(|pair| {
        let (lower, upper) = (pair[0], pair[1]);
        if score >= lower.threshold && score < upper.threshold {
            let ratio = (score - lower.threshold) / (upper.threshold - lower.threshold);
            let p = lower.percentile + ratio * (upper.percentile - lower.percentile);
            Some(Ranking { percentile: round_tenth(p), tier: lower.tier })
        } else {
            None
        }
    })
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
