//! Diff-based screen renderer

use core::fmt::Write;

use embedded_graphics::mono_font::iso_8859_1::FONT_10X20;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use heapless::String;
use profont::PROFONT_24_POINT;

use crate::clock::data::ClockData;
use crate::clock::env::{pressure_text, temperature_text};

use super::framebuffer::{FrameBuffer, WIDTH};

const SMALL: &MonoFont = &FONT_10X20;
const LARGE: &MonoFont = &PROFONT_24_POINT;

const INK: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
const INK_LARGE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(&PROFONT_24_POINT, BinaryColor::On);
const RULE: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

const LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();
const CENTER: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Top)
    .build();
const RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();

const HEADER_Y: i32 = 2;
const HEADER_RULE_Y: i32 = 26;
const MAIN: Rectangle = Rectangle::new(Point::new(0, 40), Size::new(WIDTH, 64));
const MAIN_TEXT_Y: i32 = 56;
const LINE: Rectangle = Rectangle::new(Point::new(0, 116), Size::new(WIDTH, 40));
const LINE_TEXT_Y: i32 = 126;
const FOOTER_RULE_Y: i32 = 170;
const FOOTER_Y: i32 = 176;
const CENTER_X: i32 = WIDTH as i32 / 2;

/// Which part of an edit screen is being changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Highlight {
    /// One of the four big digits, 0 = leftmost
    Digit(u8),
    Year,
    Month,
    Day,
}

/// Content of a digit edit screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditFrame {
    /// `HH:MM` or `MM:SS` as four digits
    pub digits: [u8; 4],
    /// Date line for clock edits, `None` shows the timer label instead
    pub date: Option<(u16, u8, u8)>,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Chrome {
    battery: Option<u8>,
    temperature_x10: Option<i16>,
    pressure_x10: Option<u16>,
    timer: u8,
}

impl Chrome {
    fn of(data: &ClockData) -> Self {
        Self {
            battery: data.battery,
            temperature_x10: data.temperature_x10,
            pressure_x10: data.pressure_x10,
            timer: data.active_timer_selected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Main {
    Time(u8, u8),
    Countdown(u16),
    Digits([u8; 4], Option<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineText {
    Date(u16, u8, u8),
    Timer(u8),
    EditDate((u16, u8, u8), Highlight),
}

/// Screen renderer with per-region change tracking
pub struct ClockView {
    frame: FrameBuffer,
    chrome: Option<Chrome>,
    main: Option<Main>,
    line: Option<LineText>,
    splash: bool,
}

impl Default for ClockView {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockView {
    pub const fn new() -> Self {
        Self {
            frame: FrameBuffer::new(),
            chrome: None,
            main: None,
            line: None,
            splash: false,
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Forget everything drawn so the next draw repaints the whole screen
    pub fn force_update(&mut self) {
        self.chrome = None;
        self.main = None;
        self.line = None;
        self.splash = false;
    }

    /// Boot splash
    pub fn draw_init(&mut self) -> bool {
        if self.splash {
            return false;
        }
        self.force_update();
        let _ = self.frame.clear(BinaryColor::Off);
        Text::with_text_style("KAIROS", Point::new(CENTER_X, MAIN_TEXT_Y), INK_LARGE, CENTER)
            .draw(&mut self.frame)
            .ok();
        Text::with_text_style("Startet ...", Point::new(CENTER_X, LINE_TEXT_Y), INK, CENTER)
            .draw(&mut self.frame)
            .ok();
        self.splash = true;
        true
    }

    /// Header and footer: timer labels, battery, temperature, pressure
    ///
    /// Repainting the chrome wipes the frame, so every other region is
    /// redrawn by the same draw call.
    pub fn draw_background(&mut self, data: &ClockData) -> bool {
        let key = Chrome::of(data);
        if self.chrome == Some(key) {
            return false;
        }
        self.force_update();
        let _ = self.frame.clear(BinaryColor::Off);

        let mut label: String<4> = String::new();
        for n in 1..=3u8 {
            label.clear();
            let _ = write!(label, "T{}", n);
            let x = 4 + i32::from(n - 1) * 30;
            let style = if key.timer == n { inverted(SMALL) } else { INK };
            Text::with_text_style(&label, Point::new(x, HEADER_Y), style, LEFT)
                .draw(&mut self.frame)
                .ok();
        }
        Text::with_text_style(&battery_text(key.battery), Point::new(196, HEADER_Y), INK, RIGHT)
            .draw(&mut self.frame)
            .ok();
        Line::new(Point::new(0, HEADER_RULE_Y), Point::new(WIDTH as i32 - 1, HEADER_RULE_Y))
            .into_styled(RULE)
            .draw(&mut self.frame)
            .ok();

        Line::new(Point::new(0, FOOTER_RULE_Y), Point::new(WIDTH as i32 - 1, FOOTER_RULE_Y))
            .into_styled(RULE)
            .draw(&mut self.frame)
            .ok();
        let temp = match key.temperature_x10 {
            Some(t) => temperature_text(t),
            None => placeholder("--.-\u{b0}C"),
        };
        Text::with_text_style(&temp, Point::new(4, FOOTER_Y), INK, LEFT)
            .draw(&mut self.frame)
            .ok();
        if let Some(p) = key.pressure_x10 {
            Text::with_text_style(&pressure_text(p), Point::new(196, FOOTER_Y), INK, RIGHT)
                .draw(&mut self.frame)
                .ok();
        }

        self.chrome = Some(key);
        true
    }

    /// Chrome plus `HH:MM`
    pub fn draw_time(&mut self, data: &ClockData) -> bool {
        let bg = self.draw_background(data);
        let main = self.draw_main(Main::Time(data.hour, data.minute));
        bg | main
    }

    /// Home screen: chrome, time and date
    pub fn draw_normal(&mut self, data: &ClockData) -> bool {
        let time = self.draw_time(data);
        let line = self.draw_line(LineText::Date(data.year, data.month, data.day), data);
        time | line
    }

    /// Remaining countdown as `MM:SS` with the timer label
    pub fn draw_countdown(&mut self, data: &ClockData) -> bool {
        let bg = self.draw_background(data);
        let main = self.draw_main(Main::Countdown(data.active_timer_remaining));
        let line = self.draw_line(LineText::Timer(data.active_timer_selected), data);
        bg | main | line
    }

    /// Digit entry screen with the edited field inverted
    pub fn draw_edit(&mut self, data: &ClockData, edit: &EditFrame) -> bool {
        let bg = self.draw_background(data);
        let digit = match edit.highlight {
            Highlight::Digit(n) => Some(n),
            _ => None,
        };
        let main = self.draw_main(Main::Digits(edit.digits, digit));
        let line = match edit.date {
            Some(date) => LineText::EditDate(date, edit.highlight),
            None => LineText::Timer(data.active_timer_selected),
        };
        let line = self.draw_line(line, data);
        bg | main | line
    }

    fn draw_main(&mut self, key: Main) -> bool {
        if self.main == Some(key) {
            return false;
        }
        self.frame.erase(MAIN);
        let (digits, highlight) = match key {
            Main::Time(h, m) => (split(h, m), None),
            Main::Countdown(secs) => {
                let secs = secs.min(5999);
                (split((secs / 60) as u8, (secs % 60) as u8), None)
            }
            Main::Digits(d, hl) => (d, hl),
        };
        draw_digits(&mut self.frame, digits, highlight);
        self.main = Some(key);
        true
    }

    fn draw_line(&mut self, key: LineText, data: &ClockData) -> bool {
        if self.line == Some(key) {
            return false;
        }
        self.frame.erase(LINE);
        let at = Point::new(CENTER_X, LINE_TEXT_Y);
        match key {
            LineText::Date(..) => {
                Text::with_text_style(&data.date_string(), at, INK, CENTER)
                    .draw(&mut self.frame)
                    .ok();
            }
            LineText::Timer(0) => {
                Text::with_text_style("Back", at, INK, CENTER)
                    .draw(&mut self.frame)
                    .ok();
            }
            LineText::Timer(n) => {
                let mut s: String<8> = String::new();
                let _ = write!(s, "Timer {}", n);
                Text::with_text_style(&s, at, INK, CENTER)
                    .draw(&mut self.frame)
                    .ok();
            }
            LineText::EditDate(date, highlight) => draw_edit_date(&mut self.frame, date, highlight),
        }
        self.line = Some(key);
        true
    }
}

fn inverted(font: &'static MonoFont<'static>) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::Off)
        .background_color(BinaryColor::On)
        .build()
}

fn advance(font: &MonoFont) -> i32 {
    (font.character_size.width + font.character_spacing) as i32
}

fn split(hi: u8, lo: u8) -> [u8; 4] {
    [hi / 10 % 10, hi % 10, lo / 10 % 10, lo % 10]
}

fn battery_text(battery: Option<u8>) -> String<5> {
    let mut s = String::new();
    match battery {
        Some(pct) => {
            let _ = write!(s, "{}%", pct.min(100));
        }
        None => {
            let _ = s.push_str("--%");
        }
    }
    s
}

fn placeholder(text: &str) -> String<10> {
    let mut s = String::new();
    let _ = s.push_str(text);
    s
}

/// `D D : D D`, one glyph at a time so a single digit can be inverted
fn draw_digits(frame: &mut FrameBuffer, digits: [u8; 4], highlight: Option<u8>) {
    let step = advance(LARGE);
    let mut x = CENTER_X - step * 5 / 2;
    let mut glyph = [0u8; 4];

    for (i, c) in [digits[0], digits[1], 10, digits[2], digits[3]].into_iter().enumerate() {
        let ch = if c == 10 { ':' } else { char::from(b'0' + c % 10) };
        let text = ch.encode_utf8(&mut glyph);
        let index = match i {
            0 | 1 => Some(i as u8),
            3 | 4 => Some(i as u8 - 1),
            _ => None,
        };
        let style = if index.is_some() && index == highlight {
            inverted(LARGE)
        } else {
            INK_LARGE
        };
        Text::with_text_style(text, Point::new(x, MAIN_TEXT_Y), style, LEFT)
            .draw(frame)
            .ok();
        x += step;
    }
}

/// `YYYY-MM-DD` with the edited part inverted
fn draw_edit_date(frame: &mut FrameBuffer, date: (u16, u8, u8), highlight: Highlight) {
    let (year, month, day) = date;
    let step = advance(SMALL);
    let mut x = CENTER_X - step * 5;

    let mut part: String<4> = String::new();
    let parts = [
        (Highlight::Year, u32::from(year), 4usize),
        (Highlight::Month, u32::from(month), 2),
        (Highlight::Day, u32::from(day), 2),
    ];
    for (i, (which, value, width)) in parts.into_iter().enumerate() {
        if i > 0 {
            Text::with_text_style("-", Point::new(x, LINE_TEXT_Y), INK, LEFT)
                .draw(frame)
                .ok();
            x += step;
        }
        part.clear();
        let _ = write!(part, "{:0width$}", value, width = width);
        let style = if which == highlight { inverted(SMALL) } else { INK };
        Text::with_text_style(&part, Point::new(x, LINE_TEXT_Y), style, LEFT)
            .draw(frame)
            .ok();
        x += step * width as i32;
    }
}
