// Optional extras (baggage, meals, seats) chosen per flight segment

use crate::aggregator::SsrResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOnCategory {
    Baggage,
    Meal,
    Seat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOnOption {
    pub code: String,
    pub description: String,
    pub price: f64,
    pub available: bool,
}

impl AddOnOption {
    pub fn new(code: &str, description: &str, price: f64) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            price,
            available: true,
        }
    }
}

// Sent to the booking endpoint alongside the passenger list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAddOn {
    pub segment: usize,
    pub category: AddOnCategory,
    pub code: String,
    pub price: f64,
}

/// At most one option per (segment, category); a new pick replaces the old.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddOnSelector {
    selections: BTreeMap<(usize, AddOnCategory), AddOnOption>,
}

impl AddOnSelector {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns false and leaves the current pick untouched for unavailable options
    pub fn select(&mut self, segment: usize, category: AddOnCategory, option: AddOnOption) -> bool {
        if !option.available {
            tracing::debug!(segment, ?category, code = %option.code, "ignoring unavailable add-on");
            return false;
        }
        self.selections.insert((segment, category), option);
        true
    }

    pub fn clear(&mut self, segment: usize, category: AddOnCategory) -> Option<AddOnOption> {
        self.selections.remove(&(segment, category))
    }

    pub fn get(&self, segment: usize, category: AddOnCategory) -> Option<&AddOnOption> {
        self.selections.get(&(segment, category))
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn subtotal(&self, category: AddOnCategory) -> f64 {
        self.selections
            .iter()
            .filter(|((_, c), _)| *c == category)
            .map(|(_, option)| option.price)
            .sum()
    }

    pub fn selections(&self) -> Vec<SelectedAddOn> {
        self.selections
            .iter()
            .map(|(&(segment, category), option)| SelectedAddOn {
                segment,
                category,
                code: option.code.clone(),
                price: option.price,
            })
            .collect()
    }
}

/// Options offered per segment, built from the SSR lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddOnCatalog {
    options: BTreeMap<(usize, AddOnCategory), Vec<AddOnOption>>,
}

impl AddOnCatalog {
    pub fn from_ssr(ssr: &SsrResponse) -> Self {
        let mut options: BTreeMap<(usize, AddOnCategory), Vec<AddOnOption>> = BTreeMap::new();

        for (segment, baggage) in ssr.baggage.iter().enumerate() {
            let list = baggage
                .iter()
                .map(|b| {
                    let description = b
                        .text
                        .clone()
                        .unwrap_or_else(|| format!("{} kg", b.weight));
                    AddOnOption::new(&b.code, &description, b.price)
                })
                .collect();
            options.insert((segment, AddOnCategory::Baggage), list);
        }

        for (segment, meals) in ssr.meal_dynamic.iter().enumerate() {
            let list = meals
                .iter()
                .map(|m| {
                    let description = m.airline_description.as_deref().unwrap_or(&m.code);
                    AddOnOption::new(&m.code, description, m.price)
                })
                .collect();
            options.insert((segment, AddOnCategory::Meal), list);
        }

        let seat_segments = ssr.seat_dynamic.first().map_or(0, |d| d.segment_seat.len());
        for segment in 0..seat_segments {
            let list = ssr
                .seat_rows(segment)
                .iter()
                .flat_map(|row| row.seats.iter())
                .map(|seat| {
                    let label = match seat.position_label() {
                        "" => seat.code.clone(),
                        pos => format!("{} ({})", seat.code, pos),
                    };
                    AddOnOption {
                        available: seat.is_available(),
                        ..AddOnOption::new(&seat.code, &label, seat.price)
                    }
                })
                .collect();
            options.insert((segment, AddOnCategory::Seat), list);
        }

        Self { options }
    }

    pub fn options(&self, segment: usize, category: AddOnCategory) -> &[AddOnOption] {
        self.options
            .get(&(segment, category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find(&self, segment: usize, category: AddOnCategory, code: &str) -> Option<&AddOnOption> {
        self.options(segment, category).iter().find(|o| o.code == code)
    }

    // Unknown codes and unavailable options leave the selector as it was
    pub fn select_code(
        &self,
        selector: &mut AddOnSelector,
        segment: usize,
        category: AddOnCategory,
        code: &str,
    ) -> bool {
        match self.find(segment, category, code) {
            Some(option) => selector.select(segment, category, option.clone()),
            None => false,
        }
    }
}
