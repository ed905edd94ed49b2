//! Merging partial extraction results
//!
//! Two distinct policies live here, and the difference is deliberate:
//!
//! - [`merge_chunks`] reconciles windows of ONE document. Overlapping
//!   windows see the same facts at different levels of completeness, so
//!   field conflicts resolve null-aware with later chunks winning.
//! - [`merge_into_history`] reconciles SEPARATE uploads over time. A new
//!   document is fresher evidence, so a fact it restates replaces the
//!   stored one wholesale, nulls included, while stored facts it does not
//!   mention are carried forward untouched.
//!
//! Both are pure functions over an explicit ordered accumulation; order
//! of first encounter is preserved throughout so output is deterministic
//! for a given input sequence.

use pragati_domain::{ActionPoint, Sector, StructuredExtraction, SubCategory, SubCategoryRecord};
use serde_json::{Map, Value};

/// Ordered sector -> sub-category accumulation, finalized into a
/// [`StructuredExtraction`] once every partial has been folded in.
#[derive(Default)]
struct Accumulator {
    sectors: Vec<(String, Vec<(String, SubCategoryRecord)>)>,
}

impl Accumulator {
    fn fold(&mut self, partial: StructuredExtraction) {
        for sector in partial.sectors {
            if sector.sector_name.is_empty() {
                continue;
            }
            for sub_category in sector.sub_categories {
                if sub_category.sub_category_name.is_empty() {
                    continue;
                }
                let name = sub_category.sub_category_name.clone();
                let record = sub_category.into_record();
                let slot = self.slot(&sector.sector_name, &name);
                slot.action_points.extend(record.action_points);
                merge_details(&mut slot.additional_details, record.additional_details);
            }
        }
    }

    fn slot(&mut self, sector_name: &str, sub_category: &str) -> &mut SubCategoryRecord {
        let sector_index = match self.sectors.iter().position(|(name, _)| name == sector_name) {
            Some(index) => index,
            None => {
                self.sectors.push((sector_name.to_string(), Vec::new()));
                self.sectors.len() - 1
            }
        };
        let subs = &mut self.sectors[sector_index].1;
        let sub_index = match subs.iter().position(|(name, _)| name == sub_category) {
            Some(index) => index,
            None => {
                subs.push((sub_category.to_string(), SubCategoryRecord::default()));
                subs.len() - 1
            }
        };
        &mut subs[sub_index].1
    }

    fn finalize(self, district: &str, upload_date: &str) -> StructuredExtraction {
        let mut sectors = Vec::new();
        for (sector_name, subs) in self.sectors {
            let mut sub_categories = Vec::new();
            for (sub_category_name, record) in subs {
                let deduped = SubCategoryRecord {
                    action_points: dedupe_action_points(record.action_points),
                    additional_details: record.additional_details,
                };
                // A sub-category that accumulated no action points across
                // all chunks is omitted entirely.
                if deduped.is_empty() {
                    continue;
                }
                sub_categories.push(SubCategory {
                    sub_category_name,
                    action_points: None,
                    information: Some(deduped),
                });
            }
            if sub_categories.is_empty() {
                continue;
            }
            sectors.push(Sector {
                sector_name,
                sub_categories,
            });
        }
        StructuredExtraction {
            district: district.to_string(),
            upload_date: upload_date.to_string(),
            sectors,
        }
    }
}

/// Merge per-chunk partial extractions into one record for the document.
///
/// Partials must be supplied in chunk order: the later-wins tie-break is
/// defined over the chunk sequence, not completion time.
pub fn merge_chunks(
    partials: Vec<StructuredExtraction>,
    district: &str,
    upload_date: &str,
) -> StructuredExtraction {
    let mut accumulator = Accumulator::default();
    for partial in partials {
        accumulator.fold(partial);
    }
    accumulator.finalize(district, upload_date)
}

/// Collapse duplicate action names, null-aware, later occurrence winning.
fn dedupe_action_points(points: Vec<ActionPoint>) -> Vec<ActionPoint> {
    let mut deduped: Vec<ActionPoint> = Vec::new();
    for point in points {
        if point.action_name.is_empty() {
            continue;
        }
        match deduped
            .iter_mut()
            .find(|existing| existing.action_name == point.action_name)
        {
            Some(existing) => fill_from_later(existing, point),
            None => deduped.push(point),
        }
    }
    deduped
}

/// Overwrite each field the later occurrence actually carries; a null in
/// the later occurrence never erases an earlier value.
fn fill_from_later(existing: &mut ActionPoint, later: ActionPoint) {
    if later.current_status.is_some() {
        existing.current_status = later.current_status;
    }
    if later.achievement_percentage.is_some() {
        existing.achievement_percentage = later.achievement_percentage;
    }
    if later.data_source.is_some() {
        existing.data_source = later.data_source;
    }
    if later.remarks.is_some() {
        existing.remarks = later.remarks;
    }
}

fn merge_details(existing: &mut Map<String, Value>, later: Map<String, Value>) {
    for (key, value) in later {
        existing.insert(key, value);
    }
}

/// Merge a freshly extracted record into the stored latest for its key.
///
/// Union keyed by `action_name`: names present in both take the new
/// upload's entry wholesale (the new document wins over the old for every
/// field, null or not); names only in the prior record are carried
/// forward unchanged. `additional_details` merges per key with the new
/// upload winning.
pub fn merge_into_history(
    new_record: SubCategoryRecord,
    prior_latest: Option<&SubCategoryRecord>,
) -> SubCategoryRecord {
    let Some(prior) = prior_latest else {
        return new_record;
    };

    let mut action_points: Vec<ActionPoint> = prior.action_points.clone();
    for point in new_record.action_points {
        match action_points
            .iter_mut()
            .find(|existing| existing.action_name == point.action_name)
        {
            Some(existing) => *existing = point,
            None => action_points.push(point),
        }
    }

    let mut additional_details = prior.additional_details.clone();
    merge_details(&mut additional_details, new_record.additional_details);

    SubCategoryRecord {
        action_points,
        additional_details,
    }
}
