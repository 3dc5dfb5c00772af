//! Deal lifecycle and ledger consistency tests

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use uuid::Uuid;

    use admarket_server::commission::CommissionService;
    use admarket_server::deals::{
        CreateDealRequest, DealService, OpenDisputeRequest, SubmitContentRequest,
    };
    use admarket_server::disputes::{DisputeOutcome, DisputeService, ResolveDisputeRequest};
    use admarket_server::error::ApiError;
    use admarket_server::ledger::LedgerService;
    use admarket_server::models::{
        Currency, DealStatus, DisputeStatus, TransactionType, UserRole,
    };
    use admarket_server::profiles::ProfileService;

    /// Helper to create a test database pool
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/admarket_test".to_string());

        sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database")
    }

    fn deal_service(pool: &PgPool) -> DealService {
        DealService::new(
            pool.clone(),
            CommissionService::new(pool.clone()),
            LedgerService::new(pool.clone()),
            ProfileService::new(pool.clone()),
        )
    }

    async fn seed_user(pool: &PgPool, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, email, role) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(format!("{}@example.com", id))
            .bind(role)
            .execute(pool)
            .await
            .expect("Failed to seed user");
        id
    }

    /// Returns (profile id, user id)
    async fn seed_issuer(pool: &PgPool, verified: bool) -> (Uuid, Uuid) {
        let user_id = seed_user(pool, UserRole::Issuer).await;
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO issuer_profiles (id, user_id, company_name, is_verified)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind("Acme Media")
        .bind(verified)
        .execute(pool)
        .await
        .expect("Failed to seed issuer profile");
        (id, user_id)
    }

    /// Returns (profile id, user id)
    async fn seed_blogger(pool: &PgPool) -> (Uuid, Uuid) {
        let user_id = seed_user(pool, UserRole::Blogger).await;
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO blogger_profiles (id, user_id, display_name) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(user_id)
        .bind("Test Blogger")
        .execute(pool)
        .await
        .expect("Failed to seed blogger profile");
        (id, user_id)
    }

    fn offer(blogger_id: Uuid, amount: i64) -> CreateDealRequest {
        CreateDealRequest {
            blogger_id,
            title: "Dedicated product review".to_string(),
            brief: Some("One long-form review post".to_string()),
            tz: None,
            social_platform: Some("youtube".to_string()),
            format_name: Some("integration".to_string()),
            amount,
            currency: Currency::Rub,
        }
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_full_deal_lifecycle() {
        let pool = setup_test_db().await;
        let (issuer_id, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, blogger_user) = seed_blogger(&pool).await;

        let commission = CommissionService::new(pool.clone());
        commission
            .set_blogger_rate(blogger_id, 0.2)
            .await
            .expect("Rate override should be accepted");

        let deals = deal_service(&pool);

        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 100_000))
            .await
            .expect("Deal creation should succeed");

        assert_eq!(deal.status, DealStatus::Created);
        assert_eq!(deal.amount, 100_000);
        assert_eq!(deal.platform_commission, 20_000);
        assert_eq!(deal.blogger_amount, 100_000);

        let funded = deals
            .fund_escrow(deal.id, issuer_user)
            .await
            .expect("Funding should succeed");
        assert_eq!(funded.status, DealStatus::EscrowFunded);

        let submitted = deals
            .submit_content(
                deal.id,
                blogger_user,
                SubmitContentRequest {
                    content_url: "https://example.com/post/123".to_string(),
                },
            )
            .await
            .expect("Submission should succeed");
        assert_eq!(submitted.status, DealStatus::ContentSubmitted);
        assert_eq!(
            submitted.content_url.as_deref(),
            Some("https://example.com/post/123")
        );
        assert!(submitted.content_submitted_at.is_some());

        let completed = deals
            .confirm_deal(deal.id, issuer_user)
            .await
            .expect("Confirmation should succeed");
        assert_eq!(completed.status, DealStatus::Completed);
        assert!(completed.completed_at.is_some());

        // The ledger holds the deposit and the payout, nothing else
        let transactions = deals
            .deal_transactions(deal.id, issuer_user, UserRole::Issuer)
            .await
            .expect("Party should read the ledger");
        assert_eq!(transactions.len(), 2);

        let deposit = transactions
            .iter()
            .find(|t| t.tx_type == TransactionType::EscrowDeposit)
            .expect("Deposit entry expected");
        assert_eq!(deposit.amount, 100_000);
        assert_eq!(deposit.user_id, issuer_user);

        let payout = transactions
            .iter()
            .find(|t| t.tx_type == TransactionType::BloggerPayout)
            .expect("Payout entry expected");
        assert_eq!(payout.amount, 100_000);
        assert_eq!(payout.user_id, blogger_user);

        // Both parties' completed-deal counters moved
        let issuer_total: i32 =
            sqlx::query_scalar("SELECT total_deals FROM issuer_profiles WHERE id = $1")
                .bind(issuer_id)
                .fetch_one(&pool)
                .await
                .expect("Issuer row expected");
        assert_eq!(issuer_total, 1);

        let blogger_total: i32 =
            sqlx::query_scalar("SELECT total_deals FROM blogger_profiles WHERE id = $1")
                .bind(blogger_id)
                .fetch_one(&pool)
                .await
                .expect("Blogger row expected");
        assert_eq!(blogger_total, 1);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_commission_fixed_at_creation() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, _) = seed_blogger(&pool).await;

        let commission = CommissionService::new(pool.clone());
        let deals = deal_service(&pool);

        commission.set_blogger_rate(blogger_id, 0.1).await.unwrap();
        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 50_000))
            .await
            .expect("Deal creation should succeed");
        assert_eq!(deal.platform_commission, 5_000);

        // Raising the rate afterwards must not touch the existing deal
        commission.set_blogger_rate(blogger_id, 0.25).await.unwrap();

        let unchanged = deals
            .deal_by_id(deal.id, issuer_user, UserRole::Issuer)
            .await
            .expect("Issuer should read own deal");
        assert_eq!(unchanged.platform_commission, 5_000);

        let second = deals
            .create_deal(issuer_user, offer(blogger_id, 50_000))
            .await
            .expect("Deal creation should succeed");
        assert_eq!(second.platform_commission, 12_500);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_blogger_override_upsert_and_reset() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, _) = seed_blogger(&pool).await;

        let commission = CommissionService::new(pool.clone());
        let deals = deal_service(&pool);

        let setting = commission.set_blogger_rate(blogger_id, 0.05).await.unwrap();
        assert_eq!(setting.blogger_id, Some(blogger_id));

        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 100_000))
            .await
            .unwrap();
        assert_eq!(deal.platform_commission, 5_000);

        // Reset is idempotent; a fresh override takes effect afterwards
        commission.reset_blogger_rate(blogger_id).await.unwrap();
        commission.reset_blogger_rate(blogger_id).await.unwrap();
        commission.set_blogger_rate(blogger_id, 0.3).await.unwrap();

        let second = deals
            .create_deal(issuer_user, offer(blogger_id, 100_000))
            .await
            .unwrap();
        assert_eq!(second.platform_commission, 30_000);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_global_rate_upsert() {
        let pool = setup_test_db().await;
        let commission = CommissionService::new(pool.clone());

        let first = commission.set_global_rate(0.15).await.unwrap();
        assert_eq!(first.blogger_id, None);
        assert!((first.rate - 0.15).abs() < f64::EPSILON);

        let second = commission.set_global_rate(0.12).await.unwrap();
        assert_eq!(second.blogger_id, None);
        assert!((second.rate - 0.12).abs() < f64::EPSILON);

        let overview = commission.overview().await.unwrap();
        assert!((overview.global_rate - 0.12).abs() < f64::EPSILON);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_override_free_blogger_uses_global_or_default() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, _) = seed_blogger(&pool).await;

        let commission = CommissionService::new(pool.clone());
        let deals = deal_service(&pool);

        // No override for this blogger and no global row: the hardcoded
        // default of 10% applies
        sqlx::query("DELETE FROM commission_settings WHERE blogger_id IS NULL")
            .execute(&pool)
            .await
            .expect("Global rate row should be deletable");

        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 100_000))
            .await
            .expect("Deal creation should succeed");
        assert_eq!(deal.platform_commission, 10_000);
        assert_eq!(deal.blogger_amount, 100_000);

        // Once a global row exists it wins over the default
        commission.set_global_rate(0.18).await.unwrap();

        let second = deals
            .create_deal(issuer_user, offer(blogger_id, 100_000))
            .await
            .unwrap();
        assert_eq!(second.platform_commission, 18_000);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_ledger_aggregates() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, _) = seed_blogger(&pool).await;

        let deals = deal_service(&pool);
        let ledger = LedgerService::new(pool.clone());

        let before = ledger.escrow_deposit_total().await.unwrap();

        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 25_000))
            .await
            .unwrap();
        deals.fund_escrow(deal.id, issuer_user).await.unwrap();

        let after = ledger.escrow_deposit_total().await.unwrap();
        assert_eq!(after - before, 25_000);

        // No transition writes PLATFORM_FEE; append one through the
        // ledger API and check the windowed aggregate picks it up
        let window_start = chrono::Utc::now() - chrono::Duration::minutes(1);
        LedgerService::record(
            &pool,
            deal.id,
            issuer_user,
            TransactionType::PlatformFee,
            1_250,
            Currency::Rub,
        )
        .await
        .unwrap();
        let window_end = chrono::Utc::now() + chrono::Duration::minutes(1);

        let fees = ledger
            .platform_fee_total_between(window_start, window_end)
            .await
            .unwrap();
        assert!(fees >= 1_250);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_transition_preconditions() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, blogger_user) = seed_blogger(&pool).await;

        let deals = deal_service(&pool);
        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 10_000))
            .await
            .unwrap();

        // Content before funding
        let err = deals
            .submit_content(
                deal.id,
                blogger_user,
                SubmitContentRequest {
                    content_url: "https://example.com/early".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));

        // Only the issuer funds
        let err = deals.fund_escrow(deal.id, blogger_user).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        deals.fund_escrow(deal.id, issuer_user).await.unwrap();

        // Double funding
        let err = deals.fund_escrow(deal.id, issuer_user).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));

        // Confirmation before submission
        let err = deals.confirm_deal(deal.id, issuer_user).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_stranger_cannot_read_deal() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, _) = seed_blogger(&pool).await;
        let (_, other_issuer_user) = seed_issuer(&pool, true).await;

        let deals = deal_service(&pool);
        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 10_000))
            .await
            .unwrap();

        let err = deals
            .deal_by_id(deal.id, other_issuer_user, UserRole::Issuer)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_dispute_refund_flow() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, blogger_user) = seed_blogger(&pool).await;
        let admin_user = seed_user(&pool, UserRole::Admin).await;

        let deals = deal_service(&pool);
        let disputes = DisputeService::new(pool.clone());

        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 75_000))
            .await
            .unwrap();
        deals.fund_escrow(deal.id, issuer_user).await.unwrap();

        let dispute = deals
            .open_dispute(
                deal.id,
                blogger_user,
                UserRole::Blogger,
                OpenDisputeRequest {
                    reason: "payment_terms".to_string(),
                    description: "Issuer changed the brief after funding".to_string(),
                },
            )
            .await
            .expect("Dispute should open");
        assert_eq!(dispute.status, DisputeStatus::Open);

        let frozen = deals
            .deal_by_id(deal.id, admin_user, UserRole::Admin)
            .await
            .unwrap();
        assert_eq!(frozen.status, DealStatus::Disputed);

        // One dispute per deal
        let err = deals
            .open_dispute(
                deal.id,
                issuer_user,
                UserRole::Issuer,
                OpenDisputeRequest {
                    reason: "counter".to_string(),
                    description: "Counter-claim".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));

        let resolved = disputes
            .resolve(
                dispute.id,
                ResolveDisputeRequest {
                    outcome: DisputeOutcome::Refund,
                    resolution: "Brief was changed unilaterally; escrow returned".to_string(),
                },
            )
            .await
            .expect("Resolution should succeed");
        assert_eq!(resolved.status, DisputeStatus::Resolved);
        assert!(resolved.resolved_at.is_some());

        let refunded = deals
            .deal_by_id(deal.id, admin_user, UserRole::Admin)
            .await
            .unwrap();
        assert_eq!(refunded.status, DealStatus::Refunded);

        // Refund entry returns the escrowed amount to the issuer
        let transactions = deals
            .deal_transactions(deal.id, admin_user, UserRole::Admin)
            .await
            .unwrap();
        let refund = transactions
            .iter()
            .find(|t| t.tx_type == TransactionType::Refund)
            .expect("Refund entry expected");
        assert_eq!(refund.amount, 75_000);
        assert_eq!(refund.user_id, issuer_user);

        // Resolution is final
        let err = disputes
            .resolve(
                dispute.id,
                ResolveDisputeRequest {
                    outcome: DisputeOutcome::Dismiss,
                    resolution: "Second thoughts".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_dismissal_leaves_deal_disputed() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, _) = seed_blogger(&pool).await;
        let admin_user = seed_user(&pool, UserRole::Admin).await;

        let deals = deal_service(&pool);
        let disputes = DisputeService::new(pool.clone());

        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 40_000))
            .await
            .unwrap();
        deals.fund_escrow(deal.id, issuer_user).await.unwrap();

        let dispute = deals
            .open_dispute(
                deal.id,
                issuer_user,
                UserRole::Issuer,
                OpenDisputeRequest {
                    reason: "quality".to_string(),
                    description: "Preview does not match the brief".to_string(),
                },
            )
            .await
            .unwrap();

        disputes
            .resolve(
                dispute.id,
                ResolveDisputeRequest {
                    outcome: DisputeOutcome::Dismiss,
                    resolution: "Claim unsubstantiated".to_string(),
                },
            )
            .await
            .unwrap();

        let after = deals
            .deal_by_id(deal.id, admin_user, UserRole::Admin)
            .await
            .unwrap();
        assert_eq!(after.status, DealStatus::Disputed);

        let transactions = deals
            .deal_transactions(deal.id, admin_user, UserRole::Admin)
            .await
            .unwrap();
        assert!(transactions
            .iter()
            .all(|t| t.tx_type != TransactionType::Refund));
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_no_dispute_on_closed_deal() {
        let pool = setup_test_db().await;
        let (_, issuer_user) = seed_issuer(&pool, true).await;
        let (blogger_id, blogger_user) = seed_blogger(&pool).await;

        let deals = deal_service(&pool);
        let deal = deals
            .create_deal(issuer_user, offer(blogger_id, 10_000))
            .await
            .unwrap();
        deals.fund_escrow(deal.id, issuer_user).await.unwrap();
        deals
            .submit_content(
                deal.id,
                blogger_user,
                SubmitContentRequest {
                    content_url: "https://example.com/post/9".to_string(),
                },
            )
            .await
            .unwrap();
        deals.confirm_deal(deal.id, issuer_user).await.unwrap();

        let err = deals
            .open_dispute(
                deal.id,
                blogger_user,
                UserRole::Blogger,
                OpenDisputeRequest {
                    reason: "late".to_string(),
                    description: "Too late to argue".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));
    }
}
