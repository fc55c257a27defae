use bitflags::bitflags;

bitflags! {
    /// Button bits in the order the controller shifts them out.
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const RIGHT  = 1 << 0;
        const LEFT   = 1 << 1;
        const DOWN   = 1 << 2;
        const UP     = 1 << 3;
        const START  = 1 << 4;
        const SELECT = 1 << 5;
        const B      = 1 << 6;
        const A      = 1 << 7;
    }
}
