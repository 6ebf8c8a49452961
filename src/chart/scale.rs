use chrono::NaiveDate;

/// Evenly spaced y-axis ticks from zero up to a round value >= `max`.
pub fn y_ticks(max: u64, target: usize) -> Vec<u64> {
    if max == 0 {
        return vec![0, 1];
    }
    let step = nice_step(max as f64 / target.max(1) as f64);
    let top = (max as f64 / step).ceil() as u64;
    (0..=top).map(|i| (i as f64 * step).round() as u64).collect()
}

/// Round a raw step to 1, 2, 5 or 10 times a power of ten, never below 1.
fn nice_step(raw: f64) -> f64 {
    if raw <= 1.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// At most `target` days spread across `days` (which must be sorted),
/// always including the first and last.
pub fn x_ticks(days: &[NaiveDate], target: usize) -> Vec<NaiveDate> {
    let (Some(&first), Some(&last)) = (days.first(), days.last()) else {
        return Vec::new();
    };
    if first == last || target < 2 {
        return vec![first];
    }

    let span = last.signed_duration_since(first).num_days();
    let count = (target as i64).min(span + 1);
    let mut ticks: Vec<NaiveDate> = (0..count)
        .map(|i| first + chrono::Duration::days(span * i / (count - 1)))
        .collect();
    ticks.dedup();
    ticks
}

/// Maps data coordinates onto the plot rectangle.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub first_day: Option<NaiveDate>,
    pub span_days: i64,
    pub y_max: u64,
}

impl Frame {
    pub fn x(&self, day: NaiveDate) -> f64 {
        match self.first_day {
            Some(first) if self.span_days > 0 => {
                let offset = day.signed_duration_since(first).num_days() as f64;
                self.left + offset / self.span_days as f64 * self.width
            }
            _ => self.left + self.width / 2.0,
        }
    }

    pub fn y(&self, value: u64) -> f64 {
        let max = self.y_max.max(1) as f64;
        self.top + self.height - (value as f64 / max) * self.height
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}
