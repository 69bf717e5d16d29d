//! # Sale Flow Tests
//!
//! A complete sale driven through `MintApi`, `MintAdminApi` and
//! `MintQueryApi`:
//!
//! ```text
//! [Owner] ──grant──→ [Allow list] ──mint_allow_list──→ ids 1..
//!    │
//!    └──go_public──→ [Public sale] ──mint_public──→ refund ──→ [Custody]
//!    │
//!    └──mint_privileged──→ remaining capacity
//!    │
//!    └──withdraw_proceeds──→ [Custody]
//! ```

#[cfg(test)]
mod tests {
    use tm_mint_engine::prelude::*;

    type TestService = MintService<InMemoryLedger, InMemoryCustody, FixedEntropy, InMemoryEventLog>;

    const OWNER: Address = Address::repeat_byte(0x01);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);
    const CAROL: Address = Address::repeat_byte(0xc0);

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn small_sale() -> MintConfig {
        MintConfig {
            tier_capacities: [6, 3, 1],
            mint_price: U256::from(100),
            max_per_address: 4,
            max_per_call: 3,
            base_uri: "ipfs://base/".to_string(),
            owner: OWNER,
            ..MintConfig::default()
        }
    }

    fn service_with(config: MintConfig, seed: u8) -> TestService {
        MintService::new(
            InMemoryLedger::new(),
            InMemoryCustody::new(),
            FixedEntropy(Hash::new([seed; 32])),
            InMemoryEventLog::new(),
            ServiceConfig {
                mint: config,
                check_invariants: true,
            },
        )
        .expect("valid sale configuration")
    }

    fn allocated_ids(events: &[MintEvent]) -> Vec<TokenId> {
        events
            .iter()
            .filter_map(|event| match event {
                MintEvent::Allocated { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // FULL SALE
    // =========================================================================

    #[tokio::test]
    async fn test_full_sale_lifecycle() {
        let service = service_with(small_sale(), 0x42);

        // Private phase: allow list only
        assert_eq!(service.grant_or_top_up_allow_list(OWNER, ALICE, 1).await, Ok(1));
        assert_eq!(service.grant_or_top_up_allow_list(OWNER, ALICE, 1).await, Ok(2));
        let first = service.mint_allow_list(ALICE).await.unwrap();
        let second = service.mint_allow_list(ALICE).await.unwrap();
        assert_eq!(first.ids(), vec![TokenId(1)]);
        assert_eq!(second.ids(), vec![TokenId(2)]);
        assert_eq!(
            service.mint_public(BOB, 1, U256::from(100)).await,
            Err(MintError::NotPublic)
        );

        // Public phase
        service.go_public(OWNER).await.unwrap();

        let bob_first = service.mint_public(BOB, 3, U256::from(350)).await.unwrap();
        assert_eq!(bob_first.ids(), vec![TokenId(3), TokenId(4), TokenId(5)]);
        assert_eq!(bob_first.refund, U256::from(50));

        assert!(matches!(
            service.mint_public(BOB, 2, U256::from(200)).await,
            Err(MintError::QuotaExceeded { used: 3, requested: 2, cap: 4, .. })
        ));
        service.mint_public(BOB, 1, U256::from(100)).await.unwrap();

        // Allow-list units count against the same quota
        assert!(matches!(
            service.mint_public(ALICE, 3, U256::from(300)).await,
            Err(MintError::QuotaExceeded { used: 2, .. })
        ));
        let alice_public = service.mint_public(ALICE, 2, U256::from(200)).await.unwrap();
        assert_eq!(alice_public.ids(), vec![TokenId(7), TokenId(8)]);

        // Privileged path fills what is left
        assert_eq!(
            service.mint_privileged(OWNER, CAROL, 3).await,
            Err(MintError::GlobalCapExceeded {
                requested: 3,
                remaining: 2
            })
        );
        service.mint_privileged(OWNER, CAROL, 2).await.unwrap();
        assert_eq!(
            service.mint_public(CAROL, 1, U256::from(100)).await,
            Err(MintError::NoAvailability)
        );

        // Totals
        let status = service.sale_status().await;
        assert_eq!(status.total_minted, 10);
        assert_eq!(status.global_cap, 10);
        assert_eq!(status.proceeds, U256::from(600));
        for tier in service.tier_statuses().await {
            assert_eq!(tier.allocated, tier.capacity);
            assert_eq!(tier.remaining, 0);
        }

        // Ownership
        assert_eq!(
            service.tokens_of_owner(ALICE).await,
            vec![TokenId(1), TokenId(2), TokenId(7), TokenId(8)]
        );
        assert_eq!(service.tokens_of_owner(BOB).await.len(), 4);
        assert_eq!(
            service.tokens_of_owner(CAROL).await,
            vec![TokenId(9), TokenId(10)]
        );
        assert_eq!(service.usage_of(CAROL).await, 0);

        // Events
        let events = service.events().await;
        let ids = allocated_ids(&events);
        assert_eq!(ids, (1..=10).map(TokenId).collect::<Vec<_>>());
        let batches = events
            .iter()
            .filter(|event| matches!(event, MintEvent::BatchMinted { .. }))
            .count();
        assert_eq!(batches, 6);
        assert_eq!(service.publisher().events(), events);

        // Treasury
        assert_eq!(service.withdraw_proceeds(OWNER).await, Ok(U256::from(600)));
        assert_eq!(service.custody().total_paid_to(&OWNER), U256::from(600));
        assert_eq!(service.custody().total_paid_to(&BOB), U256::from(50));

        assert!(service.check_invariants().await.is_valid());
    }

    #[tokio::test]
    async fn test_metadata_pointers() {
        let service = service_with(small_sale(), 0x07);
        let receipt = service.mint_privileged(OWNER, ALICE, 3).await.unwrap();

        for unit in &receipt.units {
            assert_eq!(
                service.token_uri(unit.id).await,
                Ok(Some(format!("ipfs://base/{}.json", unit.id)))
            );
        }

        service
            .update_tier_uri(OWNER, Tier::Legendary, "ipfs://legendary/".to_string())
            .await
            .unwrap();
        for unit in &receipt.units {
            let expected = if unit.tier == Tier::Legendary {
                format!("ipfs://legendary/{}.json", unit.id)
            } else {
                format!("ipfs://base/{}.json", unit.id)
            };
            assert_eq!(service.token_uri(unit.id).await, Ok(Some(expected)));
        }

        assert_eq!(
            service.token_uri(TokenId(4)).await,
            Err(MintError::UnknownToken(TokenId(4)))
        );
    }

    // =========================================================================
    // TIER DRAWS
    // =========================================================================

    #[tokio::test]
    async fn test_exhausted_tiers_are_skipped() {
        let config = MintConfig {
            tier_capacities: [2, 2, 2],
            max_per_call: 3,
            max_per_address: 3,
            owner: OWNER,
            ..MintConfig::default()
        };
        let service = service_with(config, 0x99);

        // Any draw of an exhausted tier would fail the reservation
        service.mint_privileged(OWNER, ALICE, 3).await.unwrap();
        service.mint_privileged(OWNER, ALICE, 3).await.unwrap();

        for tier in Tier::ALL {
            assert_eq!(service.tier_status(tier).await.allocated, 2);
        }
    }

    #[tokio::test]
    async fn test_draws_follow_remaining_capacity() {
        let service = service_with(MintConfig::default(), 0x11);
        for _ in 0..60 {
            service.mint_privileged(OWNER, ALICE, 5).await.unwrap();
        }

        let counts: Vec<u64> = service
            .tier_statuses()
            .await
            .iter()
            .map(|status| status.allocated)
            .collect();
        assert_eq!(counts.iter().sum::<u64>(), 300);
        assert!(counts[0] > counts[1], "common should lead rare: {counts:?}");
        assert!(counts[1] > counts[2], "rare should lead legendary: {counts:?}");
    }

    #[tokio::test]
    async fn test_block_entropy_service() {
        let entropy = BlockEntropy::new(BlockContext {
            number: 1,
            timestamp: 1_700_000_000,
            prevrandao: Hash::new([3u8; 32]),
        });
        let service = MintService::new(
            InMemoryLedger::new(),
            InMemoryCustody::new(),
            entropy,
            NoOpPublisher,
            ServiceConfig {
                mint: small_sale(),
                check_invariants: true,
            },
        )
        .unwrap();
        service.go_public(OWNER).await.unwrap();

        for block in 2..=4u64 {
            service.mint_public(ALICE, 1, U256::from(100)).await.unwrap();
            service.entropy().advance(BlockContext {
                number: block,
                timestamp: 1_700_000_000 + block * 12,
                prevrandao: Hash::new([block as u8; 32]),
            });
        }

        assert_eq!(service.sale_status().await.total_minted, 3);
        assert!(service.check_invariants().await.is_valid());
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    #[tokio::test]
    async fn test_config_from_env() {
        std::env::set_var("TM_TIER_CAPACITIES", "60,30,10");
        std::env::set_var("TM_MINT_PRICE_WEI", "1000");
        std::env::set_var("TM_OWNER", "0x0202020202020202020202020202020202020202");
        let config = MintConfig::from_env().unwrap();
        std::env::remove_var("TM_TIER_CAPACITIES");
        std::env::remove_var("TM_MINT_PRICE_WEI");
        std::env::remove_var("TM_OWNER");

        assert!(config.validate().is_ok());
        assert_eq!(config.global_cap(), 100);

        let owner = Address::repeat_byte(0x02);
        let service = service_with(config, 1);
        assert_eq!(service.sale_status().await.owner, owner);
        assert_eq!(service.sale_status().await.mint_price, U256::from(1000));
        assert!(matches!(
            service.go_public(OWNER).await,
            Err(MintError::NotOwner { .. })
        ));
    }

    #[tokio::test]
    async fn test_start_paused() {
        let config = MintConfig {
            start_paused: true,
            ..small_sale()
        };
        let service = service_with(config, 1);
        service.grant_or_top_up_allow_list(OWNER, ALICE, 1).await.unwrap();

        assert_eq!(service.mint_allow_list(ALICE).await, Err(MintError::Paused));
        service.unpause(OWNER).await.unwrap();
        assert!(service.mint_allow_list(ALICE).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_and_regrant() {
        let service = service_with(small_sale(), 1);
        assert_eq!(
            service.revoke_allow_list(OWNER, ALICE).await,
            Err(MintError::NotEligible { requester: ALICE })
        );

        service.grant_or_top_up_allow_list(OWNER, ALICE, 3).await.unwrap();
        service.revoke_allow_list(OWNER, ALICE).await.unwrap();
        assert_eq!(
            service.mint_allow_list(ALICE).await,
            Err(MintError::NotEligible { requester: ALICE })
        );

        assert_eq!(service.grant_or_top_up_allow_list(OWNER, ALICE, 1).await, Ok(1));
        assert!(service.mint_allow_list(ALICE).await.is_ok());

        let kinds: Vec<&str> = service
            .events()
            .await
            .iter()
            .filter(|event| event.topic() == topics::ALLOW_LIST)
            .map(|event| match event {
                MintEvent::AllowListGranted { .. } => "granted",
                MintEvent::AllowListRevoked { .. } => "revoked",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["granted", "revoked", "granted"]);
    }
}
