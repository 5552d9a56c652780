use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::range::DateRange;
use super::store::ScoringStore;
use super::types::DailyScore;
use crate::cycles::repo_types::CycleInterval;
use crate::environment::repo_types::EnvironmentSample;
use crate::profile::repo_types::CycleProfile;
use crate::records::repo_types::DailyInput;

/// In-process `ScoringStore` for engine tests.
#[derive(Default)]
pub struct MemoryStore {
    pub inputs: Mutex<BTreeMap<(Uuid, Date), DailyInput>>,
    pub environment: Mutex<HashMap<(Date, String), EnvironmentSample>>,
    pub profiles: Mutex<HashMap<Uuid, CycleProfile>>,
    pub cycles: Mutex<Vec<CycleInterval>>,
    pub scores: Mutex<BTreeMap<(Uuid, Date), DailyScore>>,
    /// Zero-based index of the `save_scores` call that fails.
    pub fail_save_call: Mutex<Option<usize>>,
    pub environment_unavailable: Mutex<bool>,
    save_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn add_input(&self, input: DailyInput) {
        self.inputs
            .lock()
            .unwrap()
            .insert((input.user_id, input.date), input);
    }

    pub fn add_cycle(&self, user_id: Uuid, start: Date, end: Option<Date>) -> Uuid {
        let id = Uuid::new_v4();
        self.cycles.lock().unwrap().push(CycleInterval {
            id,
            user_id,
            start_date: start,
            end_date: end,
        });
        id
    }

    pub fn set_profile(&self, profile: CycleProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id, profile);
    }

    pub fn score(&self, user_id: Uuid, date: Date) -> Option<DailyScore> {
        self.scores.lock().unwrap().get(&(user_id, date)).cloned()
    }

    pub fn score_count(&self) -> usize {
        self.scores.lock().unwrap().len()
    }
}

#[async_trait]
impl ScoringStore for MemoryStore {
    async fn list_input_dates(&self, user_id: Uuid, range: DateRange) -> anyhow::Result<Vec<Date>> {
        Ok(self
            .inputs
            .lock()
            .unwrap()
            .keys()
            .filter(|(u, d)| *u == user_id && range.contains(*d))
            .map(|(_, d)| *d)
            .collect())
    }

    async fn find_input(&self, user_id: Uuid, date: Date) -> anyhow::Result<Option<DailyInput>> {
        Ok(self.inputs.lock().unwrap().get(&(user_id, date)).cloned())
    }

    async fn find_environment(
        &self,
        date: Date,
        region_code: &str,
    ) -> anyhow::Result<Option<EnvironmentSample>> {
        if *self.environment_unavailable.lock().unwrap() {
            anyhow::bail!("environment table unavailable");
        }
        Ok(self
            .environment
            .lock()
            .unwrap()
            .get(&(date, region_code.to_string()))
            .cloned())
    }

    async fn find_profile(&self, user_id: Uuid) -> anyhow::Result<Option<CycleProfile>> {
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn last_cycle_on_or_before(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<CycleInterval>> {
        Ok(self
            .cycles
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && c.start_date <= date)
            .max_by_key(|c| c.start_date)
            .cloned())
    }

    async fn previous_cycle_before(
        &self,
        user_id: Uuid,
        date: Date,
    ) -> anyhow::Result<Option<CycleInterval>> {
        Ok(self
            .cycles
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && c.start_date < date)
            .max_by_key(|c| c.start_date)
            .cloned())
    }

    async fn save_scores(&self, user_id: Uuid, scores: &[DailyScore]) -> anyhow::Result<Vec<Date>> {
        let call = self.save_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_save_call.lock().unwrap() == Some(call) {
            anyhow::bail!("score batch {call} rejected");
        }

        let mut stored = self.scores.lock().unwrap();
        let mut changed = Vec::new();
        for score in scores {
            let key = (user_id, score.date);
            if stored.get(&key).is_some_and(|old| old.same_values(score)) {
                continue;
            }
            stored.insert(key, score.clone());
            changed.push(score.date);
        }
        Ok(changed)
    }
}
