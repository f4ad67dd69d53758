//! In-memory [`Database`] used in tests.
//!
//! A [`Tx`] serializes with every other access for its whole lifetime, which
//! is stricter than row locking, but enough to observe lost updates.

use std::{collections::HashMap, future::Future, sync::Arc};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Perform, Select, Transact, Update,
};
use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{chair, estate, polygon::BoundingBox, Chair, Estate, Polygon},
    infra::database::{self, Database, Script},
    read::{
        self,
        condition::{Column, Operator, Value},
        Conditions,
    },
};

/// Tables of a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`Chair`]s.
    pub chairs: HashMap<chair::Id, Chair>,

    /// Stored [`Estate`]s.
    pub estates: HashMap<estate::Id, Estate>,

    /// Performed [`Script`]s, in order.
    pub scripts: Vec<Script>,
}

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct Memory<M = NonTx> {
    /// Committed [`State`].
    state: Arc<Mutex<State>>,

    /// Access mode.
    mode: M,
}

/// Non-transactional access to a [`Memory`] database.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonTx;

/// Transactional access to a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct Tx(Arc<Mutex<Option<Working>>>);

/// [`State`] being changed by a [`Tx`].
#[derive(Debug)]
struct Working {
    /// Guard keeping every other access out.
    committed: OwnedMutexGuard<State>,

    /// Uncommitted copy of the [`State`].
    state: State,
}

impl Memory {
    /// Creates a new [`Memory`] database with the provided rows.
    pub fn new(
        chairs: impl IntoIterator<Item = Chair>,
        estates: impl IntoIterator<Item = Estate>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                chairs: chairs.into_iter().map(|c| (c.id, c)).collect(),
                estates: estates.into_iter().map(|e| (e.id, e)).collect(),
                scripts: Vec::new(),
            })),
            mode: NonTx,
        }
    }

    /// Returns a snapshot of the committed [`State`].
    pub async fn snapshot(&self) -> State {
        self.state.lock().await.clone()
    }
}

/// Access mode of a [`Memory`] database.
pub trait Mode {
    /// Runs the provided function over the [`State`] visible in this
    /// [`Mode`].
    fn with<R>(
        &self,
        state: &Arc<Mutex<State>>,
        f: impl FnOnce(&mut State) -> R,
    ) -> impl Future<Output = R>;
}

impl Mode for NonTx {
    async fn with<R>(
        &self,
        state: &Arc<Mutex<State>>,
        f: impl FnOnce(&mut State) -> R,
    ) -> R {
        f(&mut *state.lock().await)
    }
}

impl Mode for Tx {
    async fn with<R>(
        &self,
        state: &Arc<Mutex<State>>,
        f: impl FnOnce(&mut State) -> R,
    ) -> R {
        let mut working = self.0.lock().await;
        if working.is_none() {
            let committed = Arc::clone(state).lock_owned().await;
            let state = committed.clone();
            *working = Some(Working { committed, state });
        }
        f(&mut working.as_mut().unwrap().state)
    }
}

impl<M: Mode> Memory<M> {
    /// Runs the provided function over the visible [`State`].
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        self.mode.with(&self.state, f).await
    }
}

/// Value of a listing [`Column`].
enum Field<'a> {
    /// Integer value.
    Int(i64),

    /// Text value.
    Text(&'a str),
}

/// Listing filterable by [`Conditions`].
trait Filterable {
    /// Returns the value of the provided [`Column`], if this listing has it.
    fn field(&self, column: Column) -> Option<Field<'_>>;

    /// Checks whether this listing satisfies all the provided [`Conditions`].
    fn satisfies(&self, conditions: &Conditions) -> bool {
        conditions.into_iter().all(|p| {
            match (self.field(p.column), p.operator, &p.value) {
                (Some(Field::Int(f)), Operator::AtLeast, Value::Int(v)) => {
                    f >= *v
                }
                (Some(Field::Int(f)), Operator::LessThan, Value::Int(v)) => {
                    f < *v
                }
                (Some(Field::Int(f)), Operator::Equals, Value::Int(v)) => {
                    f == *v
                }
                (Some(Field::Text(f)), Operator::Equals, Value::Text(v)) => {
                    f == v
                }
                (Some(Field::Text(f)), Operator::Contains, Value::Text(v)) => {
                    f.contains(v.as_str())
                }
                _ => false,
            }
        })
    }
}

impl Filterable for Chair {
    fn field(&self, column: Column) -> Option<Field<'_>> {
        Some(match column {
            Column::Price => Field::Int(self.price),
            Column::Height => Field::Int(self.height),
            Column::Width => Field::Int(self.width),
            Column::Depth => Field::Int(self.depth),
            Column::Kind => Field::Text(&self.kind),
            Column::Color => Field::Text(&self.color),
            Column::Features => Field::Text(&self.features),
            Column::DoorHeight | Column::DoorWidth | Column::Rent => {
                return None
            }
        })
    }
}

impl Filterable for Estate {
    fn field(&self, column: Column) -> Option<Field<'_>> {
        Some(match column {
            Column::DoorHeight => Field::Int(self.door_height),
            Column::DoorWidth => Field::Int(self.door_width),
            Column::Rent => Field::Int(self.rent),
            Column::Features => Field::Text(&self.features),
            Column::Price
            | Column::Height
            | Column::Width
            | Column::Depth
            | Column::Kind
            | Column::Color => return None,
        })
    }
}

/// Returns [`Estate`]s satisfying the provided predicate in listing order.
fn ranked_estates(
    state: &State,
    pred: impl Fn(&Estate) -> bool,
) -> Vec<Estate> {
    let mut estates =
        state.estates.values().filter(|e| pred(e)).cloned().collect::<Vec<_>>();
    estates.sort_by_key(Estate::rank);
    estates
}

/// Returns [`Chair`]s satisfying the provided [`Conditions`] in listing
/// order.
fn ranked_chairs(state: &State, conditions: &Conditions) -> Vec<Chair> {
    let mut chairs = state
        .chairs
        .values()
        .filter(|c| c.satisfies(conditions))
        .cloned()
        .collect::<Vec<_>>();
    chairs.sort_by_key(Chair::rank);
    chairs
}

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory {
            state: Arc::clone(&self.state),
            mode: Tx::default(),
        })
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        if let Some(Working {
            mut committed,
            state,
        }) = self.mode.0.lock().await.take()
        {
            *committed = state;
        }
        Ok(())
    }
}

impl<M: Mode> Database<Perform<Script>> for Memory<M> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(script): Perform<Script>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| s.scripts.push(script)).await;
        Ok(())
    }
}

impl<M: Mode> Database<Select<By<Option<Chair>, chair::Id>>> for Memory<M> {
    type Ok = Option<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Chair>, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.with(|s| s.chairs.get(&id).cloned()).await)
    }
}

impl<M: Mode> Database<Lock<By<Option<Chair>, chair::Id>>> for Memory<M> {
    type Ok = Option<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Option<Chair>, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .with(|s| s.chairs.get(&id).filter(|c| c.stock > 0).cloned())
            .await)
    }
}

impl<M: Mode> Database<Select<By<read::chair::search::TotalCount, Conditions>>>
    for Memory<M>
{
    type Ok = read::chair::search::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::chair::search::TotalCount, Conditions>>,
    ) -> Result<Self::Ok, Self::Err> {
        let conditions = by.into_inner();
        let count = self.with(|s| ranked_chairs(s, &conditions).len()).await;
        Ok(i64::try_from(count).unwrap().into())
    }
}

impl<M: Mode> Database<Select<By<Vec<Chair>, read::chair::search::Selector>>>
    for Memory<M>
{
    type Ok = Vec<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Chair>, read::chair::search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::chair::search::Selector { arguments, filter } =
            by.into_inner();
        let chairs = self.with(|s| ranked_chairs(s, &filter)).await;
        Ok(arguments.slice(&chairs).to_vec())
    }
}

impl<M: Mode> Database<Select<By<Vec<Chair>, read::Cheapest>>> for Memory<M> {
    type Ok = Vec<Chair>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Chair>, read::Cheapest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::Cheapest { limit } = by.into_inner();
        let mut chairs =
            self.with(|s| s.chairs.values().cloned().collect::<Vec<_>>()).await;
        chairs.sort_by_key(|c| (c.price, c.id));
        chairs.truncate(limit);
        Ok(chairs)
    }
}

impl<M: Mode> Database<Insert<Chair>> for Memory<M> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(chair): Insert<Chair>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = chair.id;
        self.with(|s| {
            if s.chairs.contains_key(&id) {
                return Err(tracerr::new!(database::Error::from(
                    Error::DuplicateId(id.into())
                )));
            }
            _ = s.chairs.insert(id, chair);
            Ok(())
        })
        .await
    }
}

impl<M: Mode> Database<Update<Chair>> for Memory<M> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(chair): Update<Chair>,
    ) -> Result<Self::Ok, Self::Err> {
        self.with(|s| {
            if let Some(stored) = s.chairs.get_mut(&chair.id) {
                *stored = chair;
            }
        })
        .await;
        Ok(())
    }
}

impl<M: Mode> Database<Delete<By<Chair, chair::Id>>> for Memory<M> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Chair, chair::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        _ = self.with(|s| s.chairs.remove(&id)).await;
        Ok(())
    }
}

impl<M: Mode> Database<Select<By<Option<Estate>, estate::Id>>> for Memory<M> {
    type Ok = Option<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Estate>, estate::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.with(|s| s.estates.get(&id).cloned()).await)
    }
}

impl<M, IDs> Database<Select<By<HashMap<estate::Id, Estate>, IDs>>>
    for Memory<M>
where
    M: Mode,
    IDs: AsRef<[estate::Id]>,
{
    type Ok = HashMap<estate::Id, Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<estate::Id, Estate>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        Ok(self
            .with(|s| {
                ids.as_ref()
                    .iter()
                    .filter_map(|id| s.estates.get(id))
                    .map(|e| (e.id, e.clone()))
                    .collect()
            })
            .await)
    }
}

impl<M: Mode>
    Database<Select<By<read::estate::search::TotalCount, Conditions>>>
    for Memory<M>
{
    type Ok = read::estate::search::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::estate::search::TotalCount, Conditions>>,
    ) -> Result<Self::Ok, Self::Err> {
        let conditions = by.into_inner();
        let count = self
            .with(|s| ranked_estates(s, |e| e.satisfies(&conditions)).len())
            .await;
        Ok(i64::try_from(count).unwrap().into())
    }
}

impl<M: Mode>
    Database<Select<By<Vec<Estate>, read::estate::search::Selector>>>
    for Memory<M>
{
    type Ok = Vec<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Estate>, read::estate::search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::estate::search::Selector { arguments, filter } =
            by.into_inner();
        let estates = self
            .with(|s| ranked_estates(s, |e| e.satisfies(&filter)))
            .await;
        Ok(arguments.slice(&estates).to_vec())
    }
}

impl<M: Mode> Database<Select<By<read::estate::search::Ids, Conditions>>>
    for Memory<M>
{
    type Ok = read::estate::search::Ids;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::estate::search::Ids, Conditions>>,
    ) -> Result<Self::Ok, Self::Err> {
        let conditions = by.into_inner();
        let estates = self
            .with(|s| ranked_estates(s, |e| e.satisfies(&conditions)))
            .await;
        Ok(read::estate::search::Ids(
            estates.into_iter().map(|e| e.id).collect(),
        ))
    }
}

impl<M: Mode> Database<Select<By<read::estate::InBoundingBox, BoundingBox>>>
    for Memory<M>
{
    type Ok = read::estate::InBoundingBox;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::estate::InBoundingBox, BoundingBox>>,
    ) -> Result<Self::Ok, Self::Err> {
        let bbox = by.into_inner();
        Ok(read::estate::InBoundingBox(
            self.with(|s| ranked_estates(s, |e| bbox.contains(e.location())))
                .await,
        ))
    }
}

impl<M: Mode>
    Database<Select<By<read::estate::IsInPolygon, (estate::Id, Polygon)>>>
    for Memory<M>
{
    type Ok = read::estate::IsInPolygon;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::estate::IsInPolygon, (estate::Id, Polygon)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (id, polygon) = by.into_inner();
        let inside = self
            .with(|s| {
                s.estates
                    .get(&id)
                    .is_some_and(|e| polygon.contains(e.location()))
            })
            .await;
        Ok(read::estate::IsInPolygon(inside))
    }
}

impl<M: Mode>
    Database<Select<By<Vec<Estate>, read::estate::recommended::Selector>>>
    for Memory<M>
{
    type Ok = Vec<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Estate>, read::estate::recommended::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::estate::recommended::Selector { opening, limit } =
            by.into_inner();
        let mut estates = self
            .with(|s| {
                ranked_estates(s, |e| {
                    opening.passes(e.door_width, e.door_height)
                })
            })
            .await;
        estates.truncate(limit);
        Ok(estates)
    }
}

impl<M: Mode> Database<Select<By<Vec<Estate>, read::Cheapest>>> for Memory<M> {
    type Ok = Vec<Estate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Estate>, read::Cheapest>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::Cheapest { limit } = by.into_inner();
        let mut estates = self
            .with(|s| s.estates.values().cloned().collect::<Vec<_>>())
            .await;
        estates.sort_by_key(|e| (e.rent, e.id));
        estates.truncate(limit);
        Ok(estates)
    }
}

impl<M: Mode> Database<Insert<Estate>> for Memory<M> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(estate): Insert<Estate>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = estate.id;
        self.with(|s| {
            if s.estates.contains_key(&id) {
                return Err(tracerr::new!(database::Error::from(
                    Error::DuplicateId(id.into())
                )));
            }
            _ = s.estates.insert(id, estate);
            Ok(())
        })
        .await
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Row with the same ID already exists.
    #[display("row `{_0}` already exists")]
    DuplicateId(#[error(not(source))] i64),
}
