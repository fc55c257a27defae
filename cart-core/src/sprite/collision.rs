/// Axis-aligned box in whole screen pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
}

impl Hitbox {
    /// A box with no area never collides with anything.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        let (ax, ay) = (self.x as u16, self.y as u16);
        let (bx, by) = (other.x as u16, other.y as u16);

        ax < bx + other.width as u16
            && bx < ax + self.width as u16
            && ay < by + other.height as u16
            && by < ay + self.height as u16
    }
}

/// Anything with a position and a size can take part in collision tests.
pub trait Collidable {
    fn hitbox(&self) -> Hitbox;
}

impl Collidable for Hitbox {
    fn hitbox(&self) -> Hitbox {
        *self
    }
}

pub fn check_collision<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.hitbox().overlaps(&b.hitbox())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hitbox(x: u8, y: u8, width: u8, height: u8) -> Hitbox {
        Hitbox { x, y, width, height }
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = hitbox(10, 10, 10, 10);
        assert!(!check_collision(&a, &hitbox(20, 10, 10, 10)));
        assert!(check_collision(&a, &hitbox(19, 10, 10, 10)));
        assert!(!check_collision(&a, &hitbox(10, 20, 10, 10)));
        assert!(check_collision(&a, &hitbox(10, 19, 10, 10)));
    }

    #[test]
    fn collision_is_symmetric() {
        let boxes = [
            hitbox(0, 0, 16, 16),
            hitbox(15, 15, 1, 1),
            hitbox(16, 0, 8, 8),
            hitbox(250, 250, 15, 15),
            hitbox(255, 0, 1, 255),
            hitbox(4, 4, 0, 8),
            hitbox(100, 100, 0x0F, 0x2F),
        ];

        for a in &boxes {
            for b in &boxes {
                assert_eq!(check_collision(a, b), check_collision(b, a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn edges_near_the_screen_border_do_not_wrap() {
        let a = hitbox(250, 0, 15, 15);
        assert!(check_collision(&a, &hitbox(255, 0, 4, 4)));
        assert!(!check_collision(&a, &hitbox(2, 0, 4, 4)));
    }

    #[test]
    fn empty_boxes_are_inert() {
        let a = hitbox(0, 0, 32, 32);
        assert!(!check_collision(&a, &hitbox(8, 8, 0, 8)));
        assert!(!check_collision(&a, &hitbox(8, 8, 8, 0)));
    }
}
