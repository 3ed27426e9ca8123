//! Demo application state
//!
//! One struct owns every peripheral the control loop touches. Each tick
//! feeds the button bank; whenever a debounce window closes the
//! application reacts to the new button state:
//!
//! - W/A/S/D move the player sprite
//! - I lights the white LED, L the blue one
//! - newly pressed buttons are echoed to the text grid

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI0;
use embassy_rp::pwm::PwmOutput;
use embassy_rp::spi::{Blocking, Spi};
use heapless::String;

use sprig_core::graphics::{
    Color, Display, Rect, Sprite, SpriteArena, SpriteError, SpriteId, SpriteRegistry, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use sprig_core::input::{ButtonBank, ButtonId};
use sprig_core::traits::DisplayExt;
use sprig_drivers::{Font8x8, PinLine, PwmLed, St7735};

/// Concrete panel type
pub type Panel =
    St7735<Spi<'static, SPI0, Blocking>, Output<'static>, Output<'static>, Output<'static>>;

/// Concrete button bank type
pub type Buttons = ButtonBank<PinLine<Input<'static>>>;

/// Concrete LED type
pub type Led = PwmLed<PwmOutput<'static>>;

/// Player sprite edge
const PLAYER_SIZE: u16 = 8;

/// Pixels moved per evaluated window while a direction is held
const PLAYER_STEP: i16 = 2;

/// Demo application
pub struct App {
    buttons: Buttons,
    display: Display<Panel, Font8x8>,
    arena: SpriteArena,
    world: SpriteRegistry,
    player: SpriteId,
    white: Option<Led>,
    blue: Option<Led>,
    /// Kept alive so the backlight pin stays driven
    _backlight: Output<'static>,
    last_mask: u8,
}

impl App {
    /// Build the application and its sprites
    pub fn new(
        buttons: Buttons,
        display: Display<Panel, Font8x8>,
        white: Option<Led>,
        blue: Option<Led>,
        backlight: Output<'static>,
    ) -> Result<Self, SpriteError> {
        let background = display.background();
        let mut arena = SpriteArena::new();
        let mut world = SpriteRegistry::new();

        // Player: red square with a see-through centre over a yellow marker
        let mut body = Sprite::new(76, 60, 1, PLAYER_SIZE, PLAYER_SIZE, Color::RED)?;
        for row in 2..PLAYER_SIZE - 2 {
            for col in 2..PLAYER_SIZE - 2 {
                body.set_pixel(col, row, background)?;
            }
        }
        let player = arena.insert(body)?;
        world.register(player)?;

        let goal = Sprite::new(140, 108, 0, PLAYER_SIZE, PLAYER_SIZE, Color::YELLOW)?;
        let goal = arena.insert(goal)?;
        world.register(goal)?;

        Ok(Self {
            buttons,
            display,
            arena,
            world,
            player,
            white,
            blue,
            _backlight: backlight,
            last_mask: 0,
        })
    }

    /// Draw the first frame
    pub fn start(&mut self) {
        self.display.fill_screen();
        self.display.clear_text();
        self.display.append_string("sprig ready\n", Color::WHITE);
        self.display.render_sprites(&self.world, &self.arena);
        info!("Application started");
    }

    /// Run one control-loop tick
    pub fn tick(&mut self) {
        if !self.buttons.tick() {
            return;
        }

        let mask = self.buttons.pressed_mask();
        let pressed = mask & !self.last_mask;
        if mask != self.last_mask {
            debug!("Buttons: {=u8:b}", mask);
            self.update_leds();
            self.echo(pressed);
            self.last_mask = mask;
        }

        self.move_player();
    }

    fn update_leds(&mut self) {
        let white_on = self.buttons.is_pressed(ButtonId::I);
        let blue_on = self.buttons.is_pressed(ButtonId::L);

        if let Some(led) = self.white.as_mut() {
            if led.set(white_on).is_err() {
                warn!("White LED update failed");
            }
        }
        if let Some(led) = self.blue.as_mut() {
            if led.set(blue_on).is_err() {
                warn!("Blue LED update failed");
            }
        }
    }

    /// Print the names of newly pressed buttons
    fn echo(&mut self, pressed: u8) {
        if pressed == 0 {
            return;
        }

        let mut line: String<16> = String::new();
        for id in ButtonId::ALL {
            if pressed & (1 << id.index()) != 0 {
                let _ = line.push_str(id.name());
            }
        }
        let _ = write!(line, " ");

        if self.display.append_string(&line, Color::GREEN) {
            // Grid full: start over at the top
            self.display.clear_text();
            self.display.append_string(&line, Color::GREEN);
        }
    }

    fn move_player(&mut self) {
        let axis = |neg: ButtonId, pos: ButtonId, buttons: &Buttons| -> i16 {
            match (buttons.is_pressed(neg), buttons.is_pressed(pos)) {
                (true, false) => -PLAYER_STEP,
                (false, true) => PLAYER_STEP,
                _ => 0,
            }
        };
        let dx = axis(ButtonId::A, ButtonId::D, &self.buttons);
        let dy = axis(ButtonId::W, ButtonId::S, &self.buttons);
        if dx == 0 && dy == 0 {
            return;
        }

        let Some(sprite) = self.arena.get_mut(self.player) else {
            return;
        };
        let old = sprite.bounds();
        let max_x = (SCREEN_WIDTH - PLAYER_SIZE) as i16;
        let max_y = (SCREEN_HEIGHT - PLAYER_SIZE) as i16;
        let x = (sprite.x + dx).clamp(0, max_x);
        let y = (sprite.y + dy).clamp(0, max_y);
        if (x, y) == (sprite.x, sprite.y) {
            return;
        }
        sprite.move_to(x, y);

        self.erase(old);
        self.display.render_sprites(&self.world, &self.arena);
    }

    /// Paint an area with the background color
    fn erase(&mut self, area: Rect) {
        let background = self.display.background();
        self.display.transport_mut().fill_rect(area, background);
    }

    /// Display transport failures so far
    pub fn display_errors(&self) -> u32 {
        self.display.transport().error_count()
    }
}
