//! # Invariant Tests
//!
//! Drives the engine with seeded random request sequences and checks the
//! domain invariants after every request, accepted or rejected.

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use tm_mint_engine::prelude::*;

    const OWNER: Address = Address::repeat_byte(0x01);

    type TestService = MintService<InMemoryLedger, InMemoryCustody, FixedEntropy, InMemoryEventLog>;

    fn service(capacities: [u64; 3], seed: u8) -> TestService {
        MintService::new(
            InMemoryLedger::new(),
            InMemoryCustody::new(),
            FixedEntropy(Hash::new([seed; 32])),
            InMemoryEventLog::new(),
            ServiceConfig {
                mint: MintConfig {
                    tier_capacities: capacities,
                    max_per_address: 6,
                    max_per_call: 4,
                    ..MintConfig::default()
                },
                check_invariants: true,
            },
        )
        .expect("valid configuration")
    }

    fn requester(rng: &mut StdRng) -> Address {
        Address::repeat_byte(rng.gen_range(0x10..0x30))
    }

    /// Issues one random request. Returns the units it allocated.
    async fn random_request(service: &TestService, rng: &mut StdRng) -> u64 {
        let outcome = match rng.gen_range(0..10) {
            0..=4 => {
                let units = rng.gen_range(0..=5);
                let paid = milli_ether(rng.gen_range(0..=300));
                service.mint_public(requester(rng), units, paid).await
            }
            5 | 6 => service.mint_allow_list(requester(rng)).await,
            7 => {
                let units = rng.gen_range(1..=4);
                service.mint_privileged(OWNER, requester(rng), units).await
            }
            _ => {
                let _ = service
                    .grant_or_top_up_allow_list(OWNER, requester(rng), rng.gen_range(1..=3))
                    .await;
                return 0;
            }
        };
        outcome.map_or(0, |receipt| receipt.len() as u64)
    }

    // =========================================================================
    // RANDOM SEQUENCES
    // =========================================================================

    #[tokio::test]
    async fn test_invariants_hold_under_random_requests() {
        for run in 0..4u64 {
            let mut rng = StdRng::seed_from_u64(0x5eed + run);
            let service = service([40, 20, 5], run as u8 + 1);
            service.go_public(OWNER).await.unwrap();

            let mut allocated = 0u64;
            for step in 0..400 {
                allocated += random_request(&service, &mut rng).await;
                let result = service.check_invariants().await;
                assert!(result.is_valid(), "run {run} step {step}: {result:?}");
            }

            let status = service.sale_status().await;
            assert_eq!(status.total_minted, allocated);
            assert!(status.total_minted <= status.global_cap);
        }
    }

    #[tokio::test]
    async fn test_tier_caps_hold_through_exhaustion() {
        let mut rng = StdRng::seed_from_u64(7);
        let capacities = [9, 4, 2];
        let service = service(capacities, 0xab);

        while service.sale_status().await.total_minted < 15 {
            let units = rng.gen_range(1..=4);
            let _ = service
                .mint_privileged(OWNER, requester(&mut rng), units)
                .await;
        }

        for (status, capacity) in service.tier_statuses().await.iter().zip(capacities) {
            assert_eq!(status.allocated, capacity);
        }
        assert_eq!(
            service.mint_privileged(OWNER, OWNER, 1).await,
            Err(MintError::NoAvailability)
        );
        assert!(service.check_invariants().await.is_valid());
    }

    #[tokio::test]
    async fn test_quota_never_exceeded() {
        let mut rng = StdRng::seed_from_u64(99);
        let service = service([600, 300, 100], 0x21);
        service.go_public(OWNER).await.unwrap();
        let cap = service.sale_status().await.max_per_address;

        for _ in 0..300 {
            random_request(&service, &mut rng).await;
        }

        for byte in 0x10..0x30u8 {
            let user = Address::repeat_byte(byte);
            let public_and_free = service.usage_of(user).await;
            assert!(public_and_free <= cap, "{user} used {public_and_free}");
        }
    }

    #[tokio::test]
    async fn test_ids_are_dense_and_owned() {
        let mut rng = StdRng::seed_from_u64(3);
        let service = service([30, 15, 5], 0x77);
        service.go_public(OWNER).await.unwrap();

        for _ in 0..200 {
            random_request(&service, &mut rng).await;
        }

        let minted = service.sale_status().await.total_minted;
        assert_eq!(service.ledger().total_supply(), minted);
        for id in 1..=minted {
            let id = TokenId(id);
            assert!(service.owner_of(id).await.is_ok(), "{id} has no owner");
            assert!(service.tier_of(id).await.is_ok(), "{id} has no tier");
        }
        assert_eq!(
            service.tier_of(TokenId(minted + 1)).await,
            Err(MintError::UnknownToken(TokenId(minted + 1)))
        );
    }
}
