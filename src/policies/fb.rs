use rand::rngs::StdRng;

use crate::dist::Dist;

/// Tolerance for jobs tied at the same attained-service level.
const LEVEL_EPS: f64 = 1e-12;

#[derive(Clone, Debug)]
struct Job {
    remaining: f64,
    attained: f64,
    arrived: f64,
}

/// Foreground-background (least attained service). The jobs tied for the
/// minimum attained service share the server equally. The TTNC expires
/// on either a completion or a level crossing: the active set catching
/// up to the next-higher attained level. A crossing is not a completion,
/// so `update` can return `None` even when the full TTNC elapsed.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fb {
    jobs: Vec<Job>,
}

impl Fb {
    fn recalc(&self, ttnc: &mut f64) {
        if self.jobs.is_empty() {
            *ttnc = f64::INFINITY;
            return;
        }
        let min_att = self
            .jobs
            .iter()
            .map(|j| j.attained)
            .fold(f64::INFINITY, f64::min);

        let mut num_active = 0usize;
        let mut min_rem_active = f64::INFINITY;
        let mut next_level = f64::INFINITY;
        for job in &self.jobs {
            if job.attained <= min_att + LEVEL_EPS {
                num_active += 1;
                min_rem_active = min_rem_active.min(job.remaining);
            } else {
                next_level = next_level.min(job.attained);
            }
        }

        let to_completion = min_rem_active * num_active as f64;
        let to_crossing = (next_level - min_att) * num_active as f64;
        *ttnc = to_completion.min(to_crossing);
    }

    pub(crate) fn arrival(&mut self, clock: f64, ttnc: &mut f64, dist: &Dist, rng: &mut StdRng) {
        self.jobs.push(Job {
            remaining: dist.sample(rng),
            attained: 0.0,
            arrived: clock,
        });
        self.recalc(ttnc);
    }

    pub(crate) fn update(&mut self, dt: f64, clock: f64, ttnc: &mut f64) -> Option<f64> {
        let min_att = self
            .jobs
            .iter()
            .map(|j| j.attained)
            .fold(f64::INFINITY, f64::min);
        let num_active = self
            .jobs
            .iter()
            .filter(|j| j.attained <= min_att + LEVEL_EPS)
            .count();
        let share = dt / num_active as f64;
        for job in &mut self.jobs {
            if job.attained <= min_att + LEVEL_EPS {
                job.remaining -= share;
                job.attained += share;
            }
        }

        if *ttnc <= 0.0 {
            // Completions take precedence over a simultaneous crossing.
            if let Some(idx) = self.jobs.iter().position(|j| j.remaining <= LEVEL_EPS) {
                let arrived = self.jobs[idx].arrived;
                self.jobs.remove(idx);
                self.recalc(ttnc);
                return Some(clock - arrived);
            }
            // Level crossing: the active set expanded, no job finished.
            self.recalc(ttnc);
        }
        None
    }
}
