//! Fixtures shared by tests.

use std::{
    future::{Future, IntoFuture as _},
    sync::Arc,
    time::Duration,
};

use crate::{
    domain::{
        catalog::{
            ChairConditions, EstateConditions, ListCondition, Range,
            RangeCondition,
        },
        Catalog, Chair, Estate,
    },
    infra::{cache, database},
    task::{self, Background},
    Config, Service,
};

/// [`Service`] over in-memory doubles.
pub(crate) type Memory =
    Service<database::memory::Memory, cache::memory::Memory>;

/// Creates a [`Chair`] with the provided ID and popularity.
pub(crate) fn chair(id: i64, popularity: i64) -> Chair {
    Chair {
        id: id.into(),
        name: format!("chair {id}"),
        description: String::new(),
        thumbnail: format!("/images/chair/{id}.png"),
        price: 1_000,
        height: 80,
        width: 50,
        depth: 50,
        color: "black".to_owned(),
        features: String::new(),
        kind: "office".to_owned(),
        popularity,
        stock: 1,
    }
}

/// Creates an [`Estate`] with the provided ID and popularity.
pub(crate) fn estate(id: i64, popularity: i64) -> Estate {
    Estate {
        id: id.into(),
        name: format!("estate {id}"),
        description: String::new(),
        thumbnail: format!("/images/estate/{id}.png"),
        address: String::new(),
        latitude: 35.0,
        longitude: 139.0,
        rent: 50_000,
        door_height: 100,
        door_width: 100,
        features: String::new(),
        popularity,
    }
}

/// Creates a [`RangeCondition`] out of the provided bucket bounds.
pub(crate) fn ranges(bounds: &[(i64, i64)]) -> RangeCondition {
    RangeCondition {
        prefix: String::new(),
        suffix: String::new(),
        ranges: bounds
            .iter()
            .zip(0..)
            .map(|(&(min, max), id)| Range { id, min, max })
            .collect(),
    }
}

/// Creates a [`Catalog`] splitting everything at `100`.
pub(crate) fn catalog() -> Catalog {
    let buckets = ranges(&[(-1, 100), (100, -1)]);
    Catalog {
        chair: ChairConditions {
            width: buckets.clone(),
            height: buckets.clone(),
            depth: buckets.clone(),
            price: ranges(&[(-1, 3_000), (3_000, -1)]),
            color: ListCondition::default(),
            feature: ListCondition::default(),
            kind: ListCondition::default(),
        },
        estate: EstateConditions {
            door_width: buckets.clone(),
            door_height: buckets,
            rent: ranges(&[(-1, 50_000), (50_000, 100_000), (100_000, -1)]),
            feature: ListCondition::default(),
        },
    }
}

/// Creates a [`Service`] over in-memory doubles holding the provided rows.
pub(crate) fn service(
    chairs: impl IntoIterator<Item = Chair>,
    estates: impl IntoIterator<Item = Estate>,
) -> (Memory, Background) {
    let config = Config {
        catalog: Arc::new(catalog()),
        fill_estate_ids: task::fill_estate_ids::Config {
            timeout: Duration::from_secs(5),
        },
        seed_scripts: Vec::new(),
    };
    Service::new(
        config,
        database::memory::Memory::new(chairs, estates),
        cache::memory::Memory::default(),
    )
}

/// Runs the provided `body` while driving the [`Background`] [`Task`]s.
///
/// [`Task`]: crate::Task
pub(crate) async fn with_background<F: Future>(
    bg: Background,
    body: F,
) -> F::Output {
    tokio::select! {
        res = bg.into_future() => panic!("background stopped: {res:?}"),
        out = body => out,
    }
}
