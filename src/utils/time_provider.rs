use chrono::{DateTime, Utc};

///
/// An overridable clock - used for tests.
///
#[derive(Debug, Default)]
pub struct TimeProvider {
    fixed: Option<DateTime<Utc>>
}

impl TimeProvider {
    pub fn now(&self) -> DateTime<Utc> {
        match self.fixed {
            Some(fixed) => fixed,
            None => Utc::now()
        }
    }

    pub fn fix(&mut self, fixed: Option<DateTime<Utc>>) {
        self.fixed = fixed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_time_is_returned_until_cleared() {
        let fixed = "2026-01-02T03:04:05Z".parse::<DateTime<Utc>>().unwrap();

        let mut provider = TimeProvider::default();
        provider.fix(Some(fixed));
        assert_eq!(provider.now(), fixed);

        provider.fix(None);
        assert_ne!(provider.now(), fixed);
    }
}
