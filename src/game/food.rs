use super::constants::MAX_FOOD_SPAWN_ATTEMPTS;
use super::types::Point;
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct FoodManager {
    pub(crate) foods: Vec<Point>,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) max_foods: usize,
}

impl FoodManager {
    pub fn new(width: i32, height: i32, max_foods: usize) -> Self {
        Self {
            foods: Vec::with_capacity(max_foods),
            width,
            height,
            max_foods,
        }
    }

    pub fn foods(&self) -> &[Point] {
        &self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_food_at(&self, point: Point) -> bool {
        self.foods.contains(&point)
    }

    /// Places one food item on a random free cell. Returns false when the manager is
    /// already at its target or no free cell turned up within the attempt budget.
    pub fn spawn(&mut self, occupied: &HashSet<Point>) -> bool {
        if self.foods.len() >= self.max_foods {
            return false;
        }
        let mut rng = rand::thread_rng();
        for _ in 0..MAX_FOOD_SPAWN_ATTEMPTS {
            let candidate = Point::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if !occupied.contains(&candidate) && !self.is_food_at(candidate) {
                self.foods.push(candidate);
                return true;
            }
        }
        false
    }

    pub fn remove(&mut self, point: Point) -> bool {
        let Some(index) = self.foods.iter().position(|food| *food == point) else {
            return false;
        };
        self.foods.remove(index);
        true
    }

    /// Tops up to the target, one attempt per missing slot, stopping at the first
    /// spawn that makes no progress.
    pub fn ensure_minimum(&mut self, occupied: &HashSet<Point>) {
        let missing = self.max_foods.saturating_sub(self.len());
        for _ in 0..missing {
            if !self.spawn(occupied) {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_cells(width: i32, height: i32) -> HashSet<Point> {
        (0..width)
            .flat_map(|x| (0..height).map(move |y| Point::new(x, y)))
            .collect()
    }

    #[test]
    fn ensure_minimum_fills_to_target_without_duplicates() {
        let mut manager = FoodManager::new(50, 50, 10);
        let occupied: HashSet<Point> = [Point::new(1, 1), Point::new(2, 2)].into_iter().collect();
        manager.ensure_minimum(&occupied);

        assert_eq!(manager.len(), 10);
        let unique: HashSet<Point> = manager.foods().iter().copied().collect();
        assert_eq!(unique.len(), 10);
        for food in manager.foods() {
            assert!(!occupied.contains(food));
            assert!((0..50).contains(&food.x) && (0..50).contains(&food.y));
        }

        manager.ensure_minimum(&occupied);
        assert_eq!(manager.len(), 10);
    }

    #[test]
    fn spawn_is_a_no_op_at_target() {
        let mut manager = FoodManager::new(10, 10, 1);
        assert!(manager.spawn(&HashSet::new()));
        assert!(!manager.spawn(&HashSet::new()));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn ensure_minimum_terminates_on_a_saturated_grid() {
        let mut manager = FoodManager::new(2, 2, 10);
        manager.ensure_minimum(&all_cells(2, 2));
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn ensure_minimum_stops_at_available_cells() {
        let mut manager = FoodManager::new(2, 2, 10);
        let mut occupied = all_cells(2, 2);
        occupied.remove(&Point::new(1, 0));
        manager.ensure_minimum(&occupied);
        assert_eq!(manager.foods(), &[Point::new(1, 0)]);
    }

    #[test]
    fn remove_only_reports_present_food() {
        let mut manager = FoodManager::new(10, 10, 3);
        manager.foods = vec![Point::new(4, 4), Point::new(5, 5)];
        assert!(!manager.remove(Point::new(9, 9)));
        assert!(manager.remove(Point::new(4, 4)));
        assert!(!manager.remove(Point::new(4, 4)));
        assert_eq!(manager.foods(), &[Point::new(5, 5)]);
    }
}
