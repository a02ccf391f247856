use storage::{NewPayment, Storage};

#[tokio::test]
async fn payments_survive_reopening_the_database_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("storefront.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let payment_id = {
        let storage = Storage::new(&database_url).await.expect("db");
        storage
            .insert_payment(&NewPayment {
                card_number: 4111111111111111,
                expiration_date: "12/2031".to_string(),
                cvv: 0,
                amount: 2.0,
            })
            .await
            .expect("insert")
    };

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let stored = reopened
        .load_payment(&payment_id)
        .await
        .expect("load")
        .expect("payment present");
    assert_eq!(stored.expiration_date, "12/2031");
    assert_eq!(stored.cvv, 0);
    assert_eq!(reopened.count_payments().await.expect("count"), 1);
}
