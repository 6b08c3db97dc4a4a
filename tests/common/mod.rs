//! Shared analytical helpers for queueing tests.
#![allow(dead_code)]

fn factorial(n: u64) -> f64 {
    (1..=n).map(|i| i as f64).product()
}

/// Erlang-C: probability an arriving customer must wait in M/M/k with
/// offered load `a = lambda / mu`.
pub fn erlang_c(k: u64, a: f64) -> f64 {
    let rho = a / k as f64;
    let num = a.powi(k as i32) / (factorial(k) * (1.0 - rho));
    let denom: f64 = (0..k).map(|n| a.powi(n as i32) / factorial(n)).sum::<f64>() + num;
    num / denom
}

/// Expected mean response time for M/M/k:
/// `E[T] = 1/mu + C(k, a) / (k mu - lambda)`.
pub fn mmk_expected_t(lam: f64, mu: f64, k: u64) -> f64 {
    let a = lam / mu;
    1.0 / mu + erlang_c(k, a) / (k as f64 * mu - lam)
}

/// Erlang-B blocking probability for M/M/c/c, by the standard recurrence.
pub fn erlang_b(c: u64, a: f64) -> f64 {
    let mut b = 1.0;
    for k in 1..=c {
        b = a * b / (k as f64 + a * b);
    }
    b
}

/// Loss probability for M/M/1/K: `(1 - rho) rho^K / (1 - rho^(K+1))`.
pub fn mm1k_loss(rho: f64, k: u64) -> f64 {
    (1.0 - rho) * rho.powi(k as i32) / (1.0 - rho.powi(k as i32 + 1))
}
