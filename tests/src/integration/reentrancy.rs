//! # Reentrancy and Atomicity Tests
//!
//! A hostile custody calls back into the engine while a refund or a
//! withdrawal is in flight. Every nested mutating call must be rejected, and
//! a failed transfer must leave no trace of the request. Independent callers
//! are queued behind the transaction in flight instead.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, OnceLock, Weak};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tm_mint_engine::prelude::*;

    const OWNER: Address = Address::repeat_byte(0x01);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const MALLORY: Address = Address::repeat_byte(0x66);

    // =========================================================================
    // HOSTILE CUSTODY
    // =========================================================================

    /// Outcome of one nested call attempted from inside a transfer.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Nested {
        Mint(Result<MintReceipt, MintError>),
        Withdraw(Result<U256, MintError>),
        Pause(Result<(), MintError>),
        Grant(Result<u32, MintError>),
    }

    #[derive(Default)]
    struct HostileCustody {
        mint_api: OnceLock<Weak<dyn MintApi>>,
        admin_api: OnceLock<Weak<dyn MintAdminApi>>,
        nested: Mutex<Vec<Nested>>,
        fail_after_callbacks: Mutex<bool>,
        inner: InMemoryCustody,
    }

    impl HostileCustody {
        fn nested(&self) -> Vec<Nested> {
            self.nested.lock().clone()
        }
    }

    #[async_trait]
    impl PaymentCustody for HostileCustody {
        async fn send_value(&self, to: Address, amount: U256) -> Result<(), TransferError> {
            if let Some(api) = self.mint_api.get().and_then(Weak::upgrade) {
                let result = api.mint_public(MALLORY, 1, milli_ether(50)).await;
                self.nested.lock().push(Nested::Mint(result));
                let result = api.mint_privileged(OWNER, MALLORY, 1).await;
                self.nested.lock().push(Nested::Mint(result));
            }
            if let Some(admin) = self.admin_api.get().and_then(Weak::upgrade) {
                let result = admin.withdraw_proceeds(OWNER).await;
                self.nested.lock().push(Nested::Withdraw(result));
                let result = admin.pause(OWNER).await;
                self.nested.lock().push(Nested::Pause(result));
                let result = admin.grant_or_top_up_allow_list(OWNER, MALLORY, 5).await;
                self.nested.lock().push(Nested::Grant(result));
            }
            if *self.fail_after_callbacks.lock() {
                return Err(TransferError::Rejected { to });
            }
            self.inner.send_value(to, amount).await
        }
    }

    type HostileService = MintService<InMemoryLedger, HostileCustody, FixedEntropy, InMemoryEventLog>;

    fn hostile_service() -> Arc<HostileService> {
        let service = Arc::new(
            MintService::new(
                InMemoryLedger::new(),
                HostileCustody::default(),
                FixedEntropy(Hash::new([0x33; 32])),
                InMemoryEventLog::new(),
                ServiceConfig {
                    mint: MintConfig::default(),
                    check_invariants: true,
                },
            )
            .expect("default configuration is valid"),
        );
        let mint_api: Arc<dyn MintApi> = service.clone();
        let admin_api: Arc<dyn MintAdminApi> = service.clone();
        assert!(service.custody().mint_api.set(Arc::downgrade(&mint_api)).is_ok());
        assert!(service.custody().admin_api.set(Arc::downgrade(&admin_api)).is_ok());
        service
    }

    fn all_rejected(nested: &[Nested]) -> bool {
        nested.iter().all(|outcome| match outcome {
            Nested::Mint(result) => result == &Err(MintError::Reentrancy),
            Nested::Withdraw(result) => result == &Err(MintError::Reentrancy),
            Nested::Pause(result) => result == &Err(MintError::Reentrancy),
            Nested::Grant(result) => result == &Err(MintError::Reentrancy),
        })
    }

    // =========================================================================
    // TESTS
    // =========================================================================

    #[tokio::test]
    async fn test_callbacks_during_refund_are_rejected() {
        let service = hostile_service();
        service.go_public(OWNER).await.unwrap();

        let receipt = service
            .mint_public(ALICE, 2, milli_ether(120))
            .await
            .unwrap();
        assert_eq!(receipt.refund, milli_ether(20));

        let nested = service.custody().nested();
        assert_eq!(nested.len(), 5);
        assert!(all_rejected(&nested), "nested calls slipped through: {nested:?}");

        let status = service.sale_status().await;
        assert_eq!(status.total_minted, 2);
        assert!(!status.paused);
        assert_eq!(status.proceeds, milli_ether(100));
        assert_eq!(service.usage_of(MALLORY).await, 0);
        assert!(!service.allow_list_status(MALLORY).await.eligible);
        assert_eq!(service.stats().await.reentrancy_rejections, 5);
        assert!(!service.is_busy());
    }

    #[tokio::test]
    async fn test_callbacks_during_withdrawal_are_rejected() {
        let service = hostile_service();
        service.go_public(OWNER).await.unwrap();
        // Exact payment: no refund, so no callbacks yet
        service.mint_public(ALICE, 3, milli_ether(150)).await.unwrap();
        assert!(service.custody().nested().is_empty());

        let withdrawn = service.withdraw_proceeds(OWNER).await.unwrap();
        assert_eq!(withdrawn, milli_ether(150));

        let nested = service.custody().nested();
        assert!(all_rejected(&nested), "nested calls slipped through: {nested:?}");
        assert_eq!(service.sale_status().await.proceeds, U256::zero());
        assert_eq!(service.custody().inner.total_paid_to(&OWNER), milli_ether(150));
    }

    #[tokio::test]
    async fn test_failed_refund_rolls_back_everything() {
        let service = hostile_service();
        service.go_public(OWNER).await.unwrap();
        *service.custody().fail_after_callbacks.lock() = true;
        let events_before = service.events().await.len();

        let result = service.mint_public(ALICE, 2, milli_ether(130)).await;
        assert!(matches!(result, Err(MintError::RefundFailed { .. })));

        let status = service.sale_status().await;
        assert_eq!(status.total_minted, 0);
        assert_eq!(status.proceeds, U256::zero());
        assert_eq!(service.usage_of(ALICE).await, 0);
        assert!(service.tokens_of_owner(ALICE).await.is_empty());
        assert_eq!(service.events().await.len(), events_before);
        for tier in service.tier_statuses().await {
            assert_eq!(tier.allocated, 0);
        }

        // The next request starts from the same id
        *service.custody().fail_after_callbacks.lock() = false;
        let receipt = service
            .mint_public(ALICE, 1, milli_ether(60))
            .await
            .unwrap();
        assert_eq!(receipt.ids(), vec![TokenId(1)]);
        assert!(service.check_invariants().await.is_valid());
    }

    #[tokio::test]
    async fn test_failed_withdrawal_keeps_proceeds() {
        let service = hostile_service();
        service.go_public(OWNER).await.unwrap();
        service.mint_public(ALICE, 2, milli_ether(100)).await.unwrap();
        *service.custody().fail_after_callbacks.lock() = true;

        let result = service.withdraw_proceeds(OWNER).await;
        assert!(matches!(result, Err(MintError::WithdrawalFailed(_))));
        assert_eq!(service.sale_status().await.proceeds, milli_ether(100));

        *service.custody().fail_after_callbacks.lock() = false;
        assert_eq!(service.withdraw_proceeds(OWNER).await, Ok(milli_ether(100)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_are_serialized() {
        let service = Arc::new(create_test_service());
        let owner = service.sale_status().await.owner;
        service.go_public(owner).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..32u8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let requester = Address::repeat_byte(0x80 + i);
                service.mint_public(requester, 2, milli_ether(130)).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            let receipt = handle.await.unwrap().expect("independent request succeeds");
            assert_eq!(receipt.refund, milli_ether(30));
            ids.extend(receipt.ids());
        }
        ids.sort();
        assert_eq!(ids, (1..=64).map(TokenId).collect::<Vec<_>>());

        let status = service.sale_status().await;
        assert_eq!(status.total_minted, 64);
        assert_eq!(status.proceeds, milli_ether(3200));

        let stats = service.stats().await;
        assert_eq!(stats.public_mints, 32);
        assert_eq!(stats.refunds_paid, 32);
        assert_eq!(stats.rejected_requests, 0);
        assert_eq!(stats.reentrancy_rejections, 0);

        let allocation_events = service
            .events()
            .await
            .iter()
            .filter(|event| event.topic() == topics::ALLOCATION)
            .count();
        // One `Allocated` per unit plus one `BatchMinted` per request
        assert_eq!(allocation_events, 64 + 32);
        assert!(service.check_invariants().await.is_valid());
    }
}
