//! Shared fixtures for HTTP-level tests

#![allow(dead_code)]

use axum_test::TestServer;
use orders::prelude::*;
use serde_json::{Map, Value, json};

/// Build an order the way seed data would look
pub fn seed_order(id: &str, status: OrderStatus) -> Order {
    let mut details = Map::new();
    details.insert("id".to_string(), json!("90c3d873684bf381dfab29034b5bba73"));
    details.insert("name".to_string(), json!("Falafel and tahini bagel"));
    details.insert("price".to_string(), json!(6));

    Order {
        id: id.to_string(),
        deliver_to: "1600 Pennsylvania Avenue NW, Washington, DC 20500".to_string(),
        mobile_number: "(202) 456-1111".to_string(),
        status,
        dishes: vec![Dish {
            quantity: 1,
            details,
        }],
    }
}

/// Test server over the given store, with sequential ids
pub fn server_with(store: InMemoryOrderStore) -> TestServer {
    let app = ServerBuilder::new()
        .with_store(store)
        .with_id_generator(SequentialIdGenerator::starting_after(100))
        .build()
        .expect("router should build");

    TestServer::new(app).expect("Failed to create test server")
}

/// Valid body for `POST /orders`
pub fn create_body() -> Value {
    json!({
        "data": {
            "deliverTo": "308 Negra Arroyo Lane, Albuquerque, NM",
            "mobileNumber": "(505) 143-3369",
            "status": "pending",
            "dishes": [
                {
                    "id": "d351db2b49b69679504652ea1cf38241",
                    "name": "Dolcelatte and chickpea spaghetti",
                    "description": "Spaghetti topped with a blend of dolcelatte and fresh chickpeas",
                    "image_url": "https://images.example.com/spaghetti.jpg",
                    "price": 19,
                    "quantity": 2
                }
            ]
        }
    })
}

/// Valid body for `PUT /orders/{id}` with the given status
pub fn update_body(status: &str) -> Value {
    json!({
        "data": {
            "deliverTo": "Rick Sanchez (C-132)",
            "mobileNumber": "(202) 456-1111",
            "status": status,
            "dishes": [{ "id": "d1", "name": "Falafel", "price": 11, "quantity": 3 }]
        }
    })
}
