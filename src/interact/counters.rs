//! Count-up animation for statistic figures.
//!
//! A figure like `"500+"` or `"98%"` tweens from zero to its numeric value
//! in a fixed number of steps. While animating, the shown value is the
//! floor of the running float; the final frame snaps to the exact target so
//! accumulated float error never leaks into the finished display. Any `%`
//! and `+` in the source survive as a suffix, in that order.

/// One animating figure.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u64,
    current: f64,
    increment: f64,
    suffix: String,
    /// Set when the source has no digits; shown verbatim instead.
    verbatim: Option<String>,
    done: bool,
}

impl CounterAnimation {
    /// Parse a display figure into an animation that reaches the target in
    /// `steps` ticks. All digits in the source contribute to the value, so
    /// `"1,000+"` counts to 1000. A source with no digits at all shows
    /// verbatim and starts out finished.
    #[must_use]
    pub fn parse(source: &str, steps: u32) -> Self {
        let digits: String = source.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Self {
                target: 0,
                current: 0.0,
                increment: 0.0,
                suffix: String::new(),
                verbatim: Some(source.to_string()),
                done: true,
            };
        }
        let target = digits.parse::<u64>().unwrap_or(0);
        let mut suffix = String::new();
        if source.contains('%') {
            suffix.push('%');
        }
        if source.contains('+') {
            suffix.push('+');
        }
        #[allow(clippy::cast_precision_loss)]
        let increment = target as f64 / f64::from(steps.max(1));
        Self {
            target,
            current: 0.0,
            increment,
            suffix,
            verbatim: None,
            done: false,
        }
    }

    /// Advance one step. Past the target the animation completes and
    /// further ticks are no-ops.
    pub fn tick(&mut self) {
        if self.done {
            return;
        }
        self.current += self.increment;
        #[allow(clippy::cast_precision_loss)]
        if self.current >= self.target as f64 {
            self.done = true;
        }
    }

    /// Jump straight to the finished state.
    pub fn finish(&mut self) {
        self.done = true;
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    /// The figure to show right now.
    #[must_use]
    pub fn display(&self) -> String {
        if let Some(text) = &self.verbatim {
            return text.clone();
        }
        let shown = if self.done {
            self.target
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                self.current.floor() as u64
            }
        };
        format!("{shown}{}", self.suffix)
    }
}
