//! Sample data for `--in-memory` mode

use rust_decimal::Decimal;

use crate::domain::Villa;

/// User (token `sub`) granted admin rights on the in-memory adapters
pub const DEMO_ADMIN_ID: i64 = 1;

pub fn demo_villas() -> Vec<Villa> {
    vec![
        Villa {
            id: 1,
            title: "Seaside villa".into(),
            images: vec!["seaside-1.jpg".into(), "seaside-2.jpg".into()],
            city: "Ramsar".into(),
            address: "Coast road 12".into(),
            base_capacity: 4,
            maximum_capacity: 8,
            area: 220.0,
            bed_count: 3,
            has_pool: true,
            has_cooling_system: true,
            base_price_per_night: Decimal::from(3_500_000),
            extra_person_price: Decimal::from(400_000),
            rating: 4.6,
        },
        Villa {
            id: 2,
            title: "Forest cabin".into(),
            images: vec!["forest-1.jpg".into()],
            city: "Masal".into(),
            address: "Olasem village".into(),
            base_capacity: 2,
            maximum_capacity: 4,
            area: 85.0,
            bed_count: 1,
            has_pool: false,
            has_cooling_system: false,
            base_price_per_night: Decimal::from(1_800_000),
            extra_person_price: Decimal::from(250_000),
            rating: 4.2,
        },
        Villa {
            id: 3,
            title: "Desert courtyard house".into(),
            images: vec![],
            city: "Kashan".into(),
            address: "Fin garden street".into(),
            base_capacity: 6,
            maximum_capacity: 10,
            area: 310.5,
            bed_count: 5,
            has_pool: true,
            has_cooling_system: true,
            base_price_per_night: Decimal::from(5_200_000),
            extra_person_price: Decimal::from(500_000),
            rating: 4.8,
        },
    ]
}
