use std::sync::Arc;
use std::time::Duration;

use futures::lock::Mutex;
use moka::future::Cache;

/// Per-employee async mutexes guarding the read-then-write attendance sequence.
///
/// Entries idle longer than the configured TTL are evicted, and so are entries
/// pushed out when the registry is over capacity, even while a request still
/// holds the mutex. A later request for that employee then gets a fresh mutex,
/// so exclusion is best-effort; the unique `(employee_id, check-in day)` key in
/// the store is what keeps one row per day. Size the capacity above the number
/// of employees recording at once.
#[derive(Clone)]
pub struct EmployeeLocks {
    locks: Cache<u64, Arc<Mutex<()>>>,
}

impl EmployeeLocks {
    pub fn new(max_capacity: u64, idle_ttl: Duration) -> Self {
        Self {
            locks: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_idle(idle_ttl)
                .build(),
        }
    }

    /// Mutex for `employee_id`. Concurrent first requests for the same
    /// employee receive the same instance.
    pub async fn for_employee(&self, employee_id: u64) -> Arc<Mutex<()>> {
        self.locks
            .get_with(employee_id, async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for EmployeeLocks {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn same_employee_shares_a_mutex() {
        let locks = EmployeeLocks::default();

        let first = locks.for_employee(7).await;
        let second = locks.for_employee(7).await;
        let other = locks.for_employee(8).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[actix_web::test]
    async fn held_mutex_blocks_second_holder() {
        let locks = EmployeeLocks::default();
        let lock = locks.for_employee(7).await;
        let _held = lock.lock().await;

        let again = locks.for_employee(7).await;
        assert!(again.try_lock().is_none());
    }

    #[actix_web::test]
    async fn evicted_entry_hands_out_a_fresh_mutex() {
        let locks = EmployeeLocks::default();
        let lock = locks.for_employee(7).await;
        let _held = lock.lock().await;

        locks.locks.invalidate(&7).await;

        let again = locks.for_employee(7).await;
        assert!(!Arc::ptr_eq(&lock, &again));
        assert!(again.try_lock().is_some());
    }
}
