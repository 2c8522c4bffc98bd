use super::constants::{COLOR_POOL, SPAWN_MARGIN, STARTING_LENGTH};
use super::types::{DeathReason, Direction, PlayerState, Point};
use rand::Rng;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Snake {
    pub id: String,
    pub name: String,
    /// Head first.
    pub body: VecDeque<Point>,
    pub direction: Direction,
    pub next_direction: Direction,
    pub color: String,
    pub score: u32,
    pub alive: bool,
    pub death_reason: Option<DeathReason>,
    pub killer_name: Option<String>,
    pub move_counter: u32,
}

fn spawn_coordinate(rng: &mut impl Rng, extent: i32) -> i32 {
    if extent > SPAWN_MARGIN * 2 {
        rng.gen_range(SPAWN_MARGIN..extent - SPAWN_MARGIN)
    } else {
        rng.gen_range(0..extent.max(1))
    }
}

impl Snake {
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: i32, height: i32) -> Self {
        let mut rng = rand::thread_rng();
        let head = Point::new(
            spawn_coordinate(&mut rng, width),
            spawn_coordinate(&mut rng, height),
        );
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        let color = COLOR_POOL[rng.gen_range(0..COLOR_POOL.len())];

        // The body trails behind the head so the first move never bites it.
        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(STARTING_LENGTH);
        let mut cell = head;
        for _ in 0..STARTING_LENGTH {
            body.push_back(cell);
            cell = cell.step(behind, width, height);
        }

        Self {
            id: id.into(),
            name: name.into(),
            body,
            direction,
            next_direction: direction,
            color: color.to_string(),
            score: 0,
            alive: true,
            death_reason: None,
            killer_name: None,
            move_counter: 0,
        }
    }

    pub fn head(&self) -> Option<Point> {
        self.body.front().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Records `direction` for the next move unless it reverses the current heading.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.next_direction = direction;
    }

    /// Commits the pending direction and prepends the new head. The tail is left in place.
    pub fn move_head(&mut self, width: i32, height: i32) -> Option<Point> {
        if !self.alive {
            return None;
        }
        let head = self.head()?;
        self.direction = self.next_direction;
        let next = head.step(self.direction, width, height);
        self.body.push_front(next);
        Some(next)
    }

    pub fn remove_tail(&mut self) -> Option<Point> {
        self.body.pop_back()
    }

    pub fn grow(&mut self) {
        self.score += 1;
    }

    /// Index of the first non-head body cell the head overlaps.
    pub fn self_collision_index(&self) -> Option<usize> {
        let head = self.head()?;
        self.body
            .iter()
            .skip(1)
            .position(|cell| *cell == head)
            .map(|offset| offset + 1)
    }

    /// Cuts the body down to `keep` cells, crediting every removed cell to the score.
    pub fn bite_off(&mut self, keep: usize) -> usize {
        let removed = self.body.len().saturating_sub(keep);
        self.body.truncate(keep);
        self.score += removed as u32;
        removed
    }

    pub fn die(&mut self, reason: DeathReason, killer_name: Option<String>) {
        self.alive = false;
        self.death_reason = Some(reason);
        self.killer_name = killer_name;
    }

    pub fn to_player_state(&self) -> PlayerState {
        PlayerState {
            id: self.id.clone(),
            name: self.name.clone(),
            snake: self.body.iter().copied().collect(),
            color: self.color.clone(),
            score: self.score,
            alive: self.alive,
            death_reason: self.death_reason,
            killer_name: self.killer_name.clone(),
        }
    }
}
