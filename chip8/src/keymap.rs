use sdl2::keyboard::Keycode;

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
/// Indexed by Chip-8 key.
const KEYPAD: [Keycode; 16] = [
    Keycode::X,
    Keycode::Num1,
    Keycode::Num2,
    Keycode::Num3,
    Keycode::Q,
    Keycode::W,
    Keycode::E,
    Keycode::A,
    Keycode::S,
    Keycode::D,
    Keycode::Z,
    Keycode::C,
    Keycode::Num4,
    Keycode::R,
    Keycode::F,
    Keycode::V,
];

/// Emulator controls that sit outside the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// held: run faster than the configured clock
    FastForward,
    /// held: step backwards through saved states
    Rewind,
}

/// The Chip-8 key a keyboard key stands for, if any
pub fn keymap(key: Keycode) -> Option<u8> {
    KEYPAD
        .iter()
        .position(|&mapped| mapped == key)
        .map(|index| index as u8)
}

pub fn hotkey(key: Keycode) -> Option<Hotkey> {
    match key {
        Keycode::Space => Some(Hotkey::FastForward),
        Keycode::Escape => Some(Hotkey::Rewind),
        _ => None,
    }
}
