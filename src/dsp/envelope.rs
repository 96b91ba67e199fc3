/*
Level
  1.0 ┐     ╱╲________
      │    ╱  ╲       ╲
  0.7 │   ╱    ╲_______╲___
      │  ╱              ╲  ╲
  0.0 └─╱────────────────╲──╲─→ Time
      Attack Decay Sustain Release
       (A)   (D)    (S)     (R)

Attack:  Ramp from 0 → 1             (time in seconds)
Decay:   Ramp from 1 → sustain level (time in seconds)
Sustain: Hold at level               (0.0 → 1.0)
Release: Ramp from sustain → 0       (time in seconds)

Per-sample rates are derived once per parameter change:

  attack_rate  = 1 / (attack × sample_rate)
  decay_rate   = (1 − sustain) / (decay × sample_rate)
  release_rate = sustain / (release × sample_rate)

A time of zero makes the corresponding rate 1.0, i.e. the transition
completes in a single sample.
*/

/// Envelope phase. Transitions are single-directional within a trigger
/// cycle; `release()` snaps to Release from any non-Idle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePhase {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// Piecewise-linear ADSR envelope generator.
pub struct AdsrEnvelope {
    sample_rate: f32,

    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    attack_rate: f32,
    decay_rate: f32,
    release_rate: f32,

    phase: EnvelopePhase,
    level: f32,
}

impl AdsrEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            sample_rate,
            attack_time: 0.01,  // 10ms
            decay_time: 0.05,   // 50ms
            sustain_level: 0.7,
            release_time: 0.1,  // 100ms
            attack_rate: 0.0,
            decay_rate: 0.0,
            release_rate: 0.0,
            phase: EnvelopePhase::Idle,
            level: 0.0,
        };
        env.update_rates();
        env
    }

    /// Set all four parameters at once (times in seconds, sustain as level).
    pub fn set_parameters(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack_time = attack;
        self.decay_time = decay;
        self.sustain_level = sustain.clamp(0.0, 1.0);
        self.release_time = release;
        self.update_rates();
    }

    pub fn set_attack_time(&mut self, time: f32) {
        self.attack_time = time;
        self.update_rates();
    }

    pub fn set_decay_time(&mut self, time: f32) {
        self.decay_time = time;
        self.update_rates();
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
        self.update_rates();
    }

    pub fn set_release_time(&mut self, time: f32) {
        self.release_time = time;
        self.update_rates();
    }

    /// Hard restart: phase = Attack, level = 0, regardless of current state.
    /// Reused voices always get a deterministic attack.
    pub fn trigger(&mut self) {
        self.phase = EnvelopePhase::Attack;
        self.level = 0.0;
    }

    /// Enter the release phase from any non-Idle phase.
    pub fn release(&mut self) {
        if self.phase != EnvelopePhase::Idle {
            self.phase = EnvelopePhase::Release;
        }
    }

    /// Advance one sample and return the level in [0, 1].
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.phase {
            EnvelopePhase::Idle => {
                self.level = 0.0;
            }
            EnvelopePhase::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.phase = EnvelopePhase::Decay;
                }
            }
            EnvelopePhase::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.phase = EnvelopePhase::Sustain;
                }
            }
            EnvelopePhase::Sustain => {
                self.level = self.sustain_level;
            }
            EnvelopePhase::Release => {
                self.level -= self.release_rate;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.phase = EnvelopePhase::Idle;
                }
            }
        }

        self.level
    }

    pub fn is_active(&self) -> bool {
        self.phase != EnvelopePhase::Idle
    }

    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn attack_time(&self) -> f32 {
        self.attack_time
    }

    pub fn decay_time(&self) -> f32 {
        self.decay_time
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }

    pub fn release_time(&self) -> f32 {
        self.release_time
    }

    /// Return to Idle without walking the release ramp.
    pub fn reset(&mut self) {
        self.phase = EnvelopePhase::Idle;
        self.level = 0.0;
    }

    fn update_rates(&mut self) {
        self.attack_rate = if self.attack_time > 0.0 {
            1.0 / (self.attack_time * self.sample_rate)
        } else {
            1.0
        };
        self.decay_rate = if self.decay_time > 0.0 {
            (1.0 - self.sustain_level) / (self.decay_time * self.sample_rate)
        } else {
            1.0
        };
        self.release_rate = if self.release_time > 0.0 {
            self.sustain_level / (self.release_time * self.sample_rate)
        } else {
            1.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0; // Small rate keeps phase walks short

    #[test]
    fn walks_through_all_phases() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.01, 0.01, 0.5, 0.01);

        assert_eq!(env.phase(), EnvelopePhase::Idle);
        env.trigger();
        assert_eq!(env.phase(), EnvelopePhase::Attack);

        // 10 samples of attack, then decay
        for _ in 0..10 {
            env.next_sample();
        }
        assert_eq!(env.phase(), EnvelopePhase::Decay);

        for _ in 0..10 {
            env.next_sample();
        }
        assert_eq!(env.phase(), EnvelopePhase::Sustain);
        assert_eq!(env.next_sample(), 0.5);

        env.release();
        assert_eq!(env.phase(), EnvelopePhase::Release);
        for _ in 0..10 {
            env.next_sample();
        }
        assert_eq!(env.phase(), EnvelopePhase::Idle);
        assert_eq!(env.next_sample(), 0.0);
        assert!(!env.is_active());
    }

    #[test]
    fn zero_attack_reaches_full_level_in_one_sample() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.0, 0.1, 0.5, 0.1);
        env.trigger();
        assert_eq!(env.next_sample(), 1.0);
        assert_eq!(env.phase(), EnvelopePhase::Decay);
    }

    #[test]
    fn trigger_is_a_hard_restart() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.1, 0.1, 0.5, 0.1);
        env.trigger();
        for _ in 0..50 {
            env.next_sample();
        }
        let mid_level = env.level();
        assert!(mid_level > 0.1);

        env.trigger();
        assert_eq!(env.level(), 0.0);
        assert_eq!(env.phase(), EnvelopePhase::Attack);
    }

    #[test]
    fn release_from_attack_skips_decay_and_sustain() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.1, 0.1, 0.5, 0.01);
        env.trigger();
        env.next_sample();
        env.release();
        assert_eq!(env.phase(), EnvelopePhase::Release);
    }

    #[test]
    fn release_while_idle_stays_idle() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.release();
        assert_eq!(env.phase(), EnvelopePhase::Idle);
    }

    #[test]
    fn reset_silences_immediately() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.trigger();
        env.next_sample();
        env.reset();
        assert!(!env.is_active());
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn level_stays_in_unit_range() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.002, 0.002, 0.3, 0.002);
        env.trigger();
        for _ in 0..100 {
            let level = env.next_sample();
            assert!((0.0..=1.0).contains(&level), "level {level} out of range");
        }
        env.release();
        for _ in 0..100 {
            let level = env.next_sample();
            assert!((0.0..=1.0).contains(&level), "level {level} out of range");
        }
    }

    #[test]
    fn sustain_change_updates_decay_rate() {
        let mut env = AdsrEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.0, 0.01, 0.8, 0.1);
        env.set_sustain_level(0.2);
        env.trigger();
        env.next_sample(); // attack completes instantly
        // Decay must now ramp 1.0 → 0.2 in 10 samples, i.e. 0.08/sample
        let before = env.level();
        let after = env.next_sample();
        assert!((before - after - 0.08).abs() < 1e-4);
    }
}
