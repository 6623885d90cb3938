/// Oracle usage cost accounting.
use crate::constants::TOKENS_PER_PRICE_UNIT;

/// Prices in currency units per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pricing {
    pub prompt_per_million: f64,
    pub completion_per_million: f64,
}

impl Pricing {
    pub fn cost_of(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        prompt_tokens as f64 * self.prompt_per_million / TOKENS_PER_PRICE_UNIT
            + completion_tokens as f64 * self.completion_per_million / TOKENS_PER_PRICE_UNIT
    }
}

/// Running cost total. Never decreases.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostAccumulator {
    pricing: Pricing,
    total: f64,
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl CostAccumulator {
    pub fn new(pricing: Pricing) -> Self {
        assert!(
            pricing.prompt_per_million >= 0.0 && pricing.completion_per_million >= 0.0,
            "token prices must not be negative"
        );
        CostAccumulator {
            pricing,
            total: 0.0,
            prompt_tokens: 0,
            completion_tokens: 0,
        }
    }

    /// Add one call's usage and return the new running total.
    pub fn add(&mut self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        self.prompt_tokens += prompt_tokens;
        self.completion_tokens += completion_tokens;
        self.total += self.pricing.cost_of(prompt_tokens, completion_tokens);
        self.total
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens
    }

    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICING: Pricing = Pricing {
        prompt_per_million: 5.0,
        completion_per_million: 25.0,
    };

    #[test]
    fn test_cost_of_single_call() {
        // 200 prompt tokens at $5/M + 10 completion tokens at $25/M
        let cost = PRICING.cost_of(200, 10);
        assert!((cost - 0.00125).abs() < 1e-12);
    }

    #[test]
    fn test_accumulator_is_monotone() {
        let mut acc = CostAccumulator::new(PRICING);
        let mut last = acc.total();
        for (p, c) in [(100, 5), (0, 0), (1_000_000, 0), (0, 1_000_000)] {
            let total = acc.add(p, c);
            assert!(total >= last);
            last = total;
        }
        assert!((acc.total() - (0.0005 + 0.000125 + 5.0 + 25.0)).abs() < 1e-9);
        assert_eq!(acc.prompt_tokens(), 1_000_100);
        assert_eq!(acc.completion_tokens(), 1_000_005);
    }

    #[test]
    fn test_zero_usage_adds_nothing() {
        let mut acc = CostAccumulator::new(PRICING);
        assert_eq!(acc.add(0, 0), 0.0);
    }
}
