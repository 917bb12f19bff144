//! Integration tests for transactional stock operations: adjustment,
//! allocation with availability check, release, order delivery.

use cometa_db::models::crew::CreateCrew;
use cometa_db::models::material::{
    AllocationFilter, CreateAllocation, CreateMaterial, UpdateAllocation,
};
use cometa_db::models::material_order::{CreateOrder, CreateOrderItem};
use cometa_db::models::supplier::CreateSupplier;
use cometa_db::models::user::NewUser;
use cometa_db::repositories::{
    CrewRepo, MaterialOrderRepo, MaterialRepo, StockError, SupplierRepo, UserRepo,
};
use cometa_core::types::DbId;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> NewUser {
    NewUser {
        first_name: "Lager".to_string(),
        last_name: "Meister".to_string(),
        email: Some(email.to_string()),
        phone: None,
        lang_pref: "de".to_string(),
        role: "pm".to_string(),
        skills: None,
        pin_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAA".to_string(),
    }
}

fn new_material(name: &str, stock: f64) -> CreateMaterial {
    CreateMaterial {
        name: name.to_string(),
        category: "conduit".to_string(),
        unit: "meter".to_string(),
        unit_cost: 1.5,
        current_stock_qty: stock,
        min_stock_level: 100.0,
        supplier_id: None,
        description: None,
    }
}

async fn seed_crew(pool: &PgPool, name: &str) -> DbId {
    let crew = CrewRepo::create(
        pool,
        &CreateCrew {
            name: name.to_string(),
            project_id: None,
            foreman_user_id: None,
        },
    )
    .await
    .expect("crew seeding should succeed");
    crew.id
}

fn allocation_to_crew(material_id: DbId, crew_id: DbId, qty: f64) -> CreateAllocation {
    CreateAllocation {
        material_id,
        project_id: None,
        crew_id: Some(crew_id),
        allocated_qty: qty,
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Stock adjustment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn adjust_stock_writes_move_row(pool: PgPool) {
    let material = MaterialRepo::create(&pool, &new_material("DN50 conduit", 500.0))
        .await
        .unwrap();

    let adjustment = MaterialRepo::adjust_stock(&pool, material.id, -120.0, "site delivery")
        .await
        .unwrap()
        .expect("material exists");

    assert_eq!(adjustment.old_quantity, 500.0);
    assert_eq!(adjustment.new_quantity, 380.0);

    let moves = MaterialRepo::list_moves(&pool, material.id, 10).await.unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].move_type, "adjust");
    assert_eq!(moves[0].quantity, -120.0);
    assert_eq!(moves[0].reason.as_deref(), Some("site delivery"));
}

#[sqlx::test(migrations = "./migrations")]
async fn adjust_stock_clamps_at_zero(pool: PgPool) {
    let material = MaterialRepo::create(&pool, &new_material("Marker tape", 30.0))
        .await
        .unwrap();

    let adjustment = MaterialRepo::adjust_stock(&pool, material.id, -100.0, "damaged")
        .await
        .unwrap()
        .expect("material exists");

    assert_eq!(adjustment.new_quantity, 0.0);

    let reloaded = MaterialRepo::find_by_id(&pool, material.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.current_stock_qty, 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn adjust_missing_material_returns_none(pool: PgPool) {
    let result = MaterialRepo::adjust_stock(&pool, 424_242, 5.0, "noop")
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn allocate_reserves_stock_and_writes_move(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("pm@example.com")).await.unwrap();
    let material = MaterialRepo::create(&pool, &new_material("Fiber cable", 1000.0))
        .await
        .unwrap();
    let crew_id = seed_crew(&pool, "K0").await;

    let allocation = MaterialRepo::allocate(
        &pool,
        user.id,
        &allocation_to_crew(material.id, crew_id, 400.0),
    )
    .await
    .expect("allocation succeeds");

    assert_eq!(allocation.allocated_qty, 400.0);
    assert_eq!(allocation.used_qty, 0.0);
    assert_eq!(allocation.material_name.as_deref(), Some("Fiber cable"));

    let reloaded = MaterialRepo::find_by_id(&pool, material.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.reserved_qty, 400.0);
    assert_eq!(reloaded.available_qty(), 600.0);

    let moves = MaterialRepo::list_moves(&pool, material.id, 10).await.unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].move_type, "allocate");
}

#[sqlx::test(migrations = "./migrations")]
async fn allocate_more_than_available_fails(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("pm2@example.com")).await.unwrap();
    let material = MaterialRepo::create(&pool, &new_material("Splice tray", 50.0))
        .await
        .unwrap();
    let crew_a = seed_crew(&pool, "K1").await;
    let crew_b = seed_crew(&pool, "K2").await;

    // First allocation reserves most of the stock.
    MaterialRepo::allocate(&pool, user.id, &allocation_to_crew(material.id, crew_a, 40.0))
        .await
        .unwrap();

    // Second allocation exceeds the remaining 10.
    let err = MaterialRepo::allocate(&pool, user.id, &allocation_to_crew(material.id, crew_b, 25.0))
        .await
        .expect_err("over-allocation must fail");

    match err {
        StockError::Insufficient {
            requested,
            available,
        } => {
            assert_eq!(requested, 25.0);
            assert_eq!(available, 10.0);
        }
        other => panic!("expected Insufficient, got {other:?}"),
    }

    // The failed allocation must not have reserved anything.
    let reloaded = MaterialRepo::find_by_id(&pool, material.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.reserved_qty, 40.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn release_allocation_frees_reservation(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("pm3@example.com")).await.unwrap();
    let material = MaterialRepo::create(&pool, &new_material("Warn mesh", 200.0))
        .await
        .unwrap();
    let crew_id = seed_crew(&pool, "K3").await;

    let allocation = MaterialRepo::allocate(
        &pool,
        user.id,
        &allocation_to_crew(material.id, crew_id, 75.0),
    )
    .await
    .unwrap();

    // Record partial consumption, then release.
    let updated = MaterialRepo::update_allocation(
        &pool,
        allocation.id,
        &UpdateAllocation { used_qty: 50.0 },
    )
    .await
    .unwrap()
    .expect("allocation exists");
    assert_eq!(updated.used_qty, 50.0);

    let released = MaterialRepo::release_allocation(&pool, allocation.id)
        .await
        .unwrap();
    assert!(released);

    let reloaded = MaterialRepo::find_by_id(&pool, material.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.reserved_qty, 0.0);

    let filter = AllocationFilter::default();
    let remaining = MaterialRepo::list_allocations(&pool, &filter, 20, 0)
        .await
        .unwrap();
    assert!(remaining.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn used_qty_cannot_exceed_allocated(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("pm4@example.com")).await.unwrap();
    let material = MaterialRepo::create(&pool, &new_material("Clips", 100.0))
        .await
        .unwrap();
    let crew_id = seed_crew(&pool, "K4").await;

    let allocation = MaterialRepo::allocate(
        &pool,
        user.id,
        &allocation_to_crew(material.id, crew_id, 20.0),
    )
    .await
    .unwrap();

    let result = MaterialRepo::update_allocation(
        &pool,
        allocation.id,
        &UpdateAllocation { used_qty: 30.0 },
    )
    .await
    .unwrap();
    assert!(result.is_none(), "over-consumption must be rejected");
}

// ---------------------------------------------------------------------------
// Order delivery
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delivering_order_receives_items_into_stock(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("buyer@example.com")).await.unwrap();
    let supplier = SupplierRepo::create(
        &pool,
        &CreateSupplier {
            name: "KabelTec GmbH".to_string(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            payment_terms: None,
        },
    )
    .await
    .unwrap();
    let material = MaterialRepo::create(&pool, &new_material("Microduct", 10.0))
        .await
        .unwrap();

    let order = MaterialOrderRepo::create(
        &pool,
        user.id,
        &CreateOrder {
            supplier_id: supplier.id,
            order_number: "PO-2025-001".to_string(),
            expected_delivery_date: None,
            notes: None,
            items: vec![CreateOrderItem {
                material_id: material.id,
                quantity: 250.0,
                unit_cost: 0.8,
            }],
        },
    )
    .await
    .unwrap();
    assert_eq!(order.status, "draft");
    assert_eq!(order.total_cost, 200.0);

    let delivered = MaterialOrderRepo::deliver(&pool, order.id)
        .await
        .unwrap()
        .expect("order exists and is not terminal");
    assert_eq!(delivered.status, "delivered");

    let reloaded = MaterialRepo::find_by_id(&pool, material.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.current_stock_qty, 260.0);

    let moves = MaterialRepo::list_moves(&pool, material.id, 10).await.unwrap();
    assert_eq!(moves[0].move_type, "receive");

    // Delivering again is a no-op conflict.
    let again = MaterialOrderRepo::deliver(&pool, order.id).await.unwrap();
    assert!(again.is_none());
}
