//! Tile grid ownership and route compilation.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use village_defence_core::{
    PlacementError, SpawnPointId, Tile, TileDirection, TileIndex, TileMap, TileMarker, WorldRect,
};

/// Ordered, duplicate-free waypoints from a spawn tile toward the home.
///
/// Routes are compiled once when the grid is built and shared by every enemy
/// spawned at the same point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    waypoints: Vec<TileIndex>,
}

impl Route {
    /// Walks the direction markers starting at `origin`.
    ///
    /// The walk stops after including the home tile or a tile without a
    /// direction marker, and stops before stepping outside the map or onto a
    /// tile it already visited.
    #[must_use]
    pub fn compile(map: &TileMap, origin: TileIndex) -> Self {
        let mut waypoints = Vec::new();
        let mut visited = BTreeSet::new();
        let mut cursor = Some(origin);

        while let Some(index) = cursor {
            let Some(tile) = map.tile(index) else {
                break;
            };
            if !visited.insert(index) {
                break;
            }

            waypoints.push(index);
            if tile.marker() == TileMarker::Home {
                break;
            }
            cursor = index.step(tile.direction());
        }

        Self { waypoints }
    }

    /// Waypoints in walking order.
    #[must_use]
    pub fn waypoints(&self) -> &[TileIndex] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Map tiles together with the home location and the compiled routes.
#[derive(Clone, Debug)]
pub struct Grid {
    map: TileMap,
    home: Option<TileIndex>,
    routes: BTreeMap<SpawnPointId, Arc<Route>>,
}

impl Grid {
    /// Scans the map for the home and spawn tiles and compiles every route.
    ///
    /// The first home tile in row-major order is honoured. When several tiles
    /// share a spawn point identifier, the last one wins.
    #[must_use]
    pub fn new(map: TileMap) -> Self {
        let mut home = None;
        let mut origins = BTreeMap::new();

        for (index, tile) in map.iter() {
            match tile.marker() {
                TileMarker::Home => {
                    if home.is_none() {
                        home = Some(index);
                    }
                }
                TileMarker::SpawnPoint(id) => {
                    let _ = origins.insert(id, index);
                }
                TileMarker::None => {}
            }
        }

        let routes = origins
            .into_iter()
            .map(|(id, origin)| (id, Arc::new(Route::compile(&map, origin))))
            .collect();

        Self { map, home, routes }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.map.columns()
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.map.rows()
    }

    /// Retrieves a tile, if `index` lies inside the map.
    #[must_use]
    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        self.map.tile(index)
    }

    /// Honoured home tile, if the map has one.
    #[must_use]
    pub const fn home(&self) -> Option<TileIndex> {
        self.home
    }

    /// Compiled route for a spawn point.
    #[must_use]
    pub fn route(&self, spawn_point: SpawnPointId) -> Option<&Arc<Route>> {
        self.routes.get(&spawn_point)
    }

    /// Spawn points with a compiled route, in ascending order.
    pub fn spawn_points(&self) -> impl Iterator<Item = SpawnPointId> + '_ {
        self.routes.keys().copied()
    }

    /// World rectangle covered by the map.
    #[must_use]
    pub fn bounds(&self) -> WorldRect {
        self.map.bounds()
    }

    pub(crate) fn check_placement(&self, index: TileIndex) -> Result<(), PlacementError> {
        let tile = self.map.tile(index).ok_or(PlacementError::OutOfBounds)?;
        if tile.is_occupied() {
            return Err(PlacementError::Occupied);
        }
        if tile.decoration().is_some() || tile.direction() != TileDirection::None {
            return Err(PlacementError::Blocked);
        }
        Ok(())
    }

    pub(crate) fn mark_occupied(&mut self, index: TileIndex) {
        if let Some(tile) = self.map.tile_mut(index) {
            tile.mark_occupied();
        }
    }
}
