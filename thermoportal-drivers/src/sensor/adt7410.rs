//! ADT7410 I2C temperature sensor
//!
//! ±0.5°C digital sensor with 13-bit (0.0625°C) or 16-bit (0.0078°C)
//! resolution. Powers up in continuous conversion mode, so a reading is
//! just a two-byte register read.

use embedded_hal::i2c::I2c;
use thermoportal_core::traits::{SensorError, TemperatureSensor};
use thermoportal_core::units::X128_PER_DEGREE;

/// Register map
mod reg {
    pub const TEMP_MSB: u8 = 0x00;
    pub const CONFIG: u8 = 0x03;
    pub const ID: u8 = 0x0B;
}

/// Config register: 16-bit resolution
const CONFIG_RESOLUTION_16BIT: u8 = 0x80;

/// Manufacturer ID in the top five bits of the ID register
const MANUFACTURER_ID: u8 = 0b1100_1000;
const MANUFACTURER_MASK: u8 = 0b1111_1000;

/// Rated measurement range (×128)
const MIN_TEMP_X128: i16 = -55 * X128_PER_DEGREE as i16;
const MAX_TEMP_X128: i16 = 150 * X128_PER_DEGREE as i16;

/// ADT7410 driver
pub struct Adt7410<I2C> {
    i2c: I2C,
    address: u8,
    high_resolution: bool,
}

impl<I2C: I2c> Adt7410<I2C> {
    /// Create a driver for the device at `address`
    ///
    /// The device starts in 13-bit mode after power-up.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            high_resolution: false,
        }
    }

    /// Check that an ADT7410 answers at the configured address
    ///
    /// A bus error (no ACK) and a foreign ID both mean the chip is not there.
    pub fn probe(&mut self) -> Result<(), SensorError> {
        let id = self.read_register(reg::ID).map_err(|_| SensorError::NotFound)?;
        if id & MANUFACTURER_MASK != MANUFACTURER_ID {
            return Err(SensorError::NotFound);
        }
        Ok(())
    }

    /// Switch between 13-bit and 16-bit conversions
    pub fn set_high_resolution(&mut self, enabled: bool) -> Result<(), SensorError> {
        let config = self.read_register(reg::CONFIG)?;
        let config = if enabled {
            config | CONFIG_RESOLUTION_16BIT
        } else {
            config & !CONFIG_RESOLUTION_16BIT
        };
        self.i2c
            .write(self.address, &[reg::CONFIG, config])
            .map_err(|_| SensorError::Bus)?;
        self.high_resolution = enabled;
        Ok(())
    }

    /// Whether 16-bit conversions are enabled
    pub fn high_resolution(&self) -> bool {
        self.high_resolution
    }

    /// Read the raw temperature register pair
    pub fn read_raw(&mut self) -> Result<i16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg::TEMP_MSB], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(i16::from_be_bytes(buf))
    }

    fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }
}

/// Convert a raw register value to 1/128°C units
///
/// In 16-bit mode the register already counts 1/128°C. In 13-bit mode the
/// bottom three bits are flags and the remaining value counts 1/16°C, so
/// clearing the flags leaves the same scale.
pub fn raw_to_celsius_x128(raw: i16, high_resolution: bool) -> i16 {
    if high_resolution {
        raw
    } else {
        raw & !0b111
    }
}

impl<I2C: I2c> TemperatureSensor for Adt7410<I2C> {
    fn read_celsius_x128(&mut self) -> Result<i16, SensorError> {
        let raw = self.read_raw()?;
        let temp = raw_to_celsius_x128(raw, self.high_resolution);

        if !(MIN_TEMP_X128..=MAX_TEMP_X128).contains(&temp) {
            return Err(SensorError::OutOfRange);
        }

        Ok(temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermoportal_core::config::ADT7410_ADDRESS as DEFAULT_ADDRESS;
    use thermoportal_core::units::celsius_x128_to_fahrenheit;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Register-file model of the chip
    struct FakeBus {
        address: u8,
        regs: [u8; 0x30],
        pointer: usize,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut regs = [0u8; 0x30];
            regs[reg::ID as usize] = 0xCB; // manufacturer 11001, revision 011
            Self {
                address: DEFAULT_ADDRESS,
                regs,
                pointer: 0,
            }
        }

        fn with_raw(raw: i16) -> Self {
            let mut bus = Self::new();
            let [msb, lsb] = raw.to_be_bytes();
            bus.regs[reg::TEMP_MSB as usize] = msb;
            bus.regs[reg::TEMP_MSB as usize + 1] = lsb;
            bus
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != self.address {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&pointer, data)) = bytes.split_first() {
                            self.pointer = pointer as usize;
                            for (i, b) in data.iter().enumerate() {
                                self.regs[self.pointer + i] = *b;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = self.regs[self.pointer + i];
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_raw_conversion_16bit() {
        // 25.0°C = 0x0C80
        assert_eq!(raw_to_celsius_x128(0x0C80, true), 3200);
        assert_eq!(raw_to_celsius_x128(1, true), 1);
        // -10.5°C
        assert_eq!(raw_to_celsius_x128(-1344, true), -1344);
    }

    #[test]
    fn test_raw_conversion_13bit() {
        // 25.0°C = 0x0C80 (flags in the low bits are ignored)
        assert_eq!(raw_to_celsius_x128(0x0C80, false), 3200);
        assert_eq!(raw_to_celsius_x128(0x0C87, false), 3200);
        // -0.0625°C
        assert_eq!(raw_to_celsius_x128(-8, false), -8);
        assert_eq!(raw_to_celsius_x128(-7, false), -8);
        // -40°C
        assert_eq!(raw_to_celsius_x128(-40 * 128, false), -5120);
    }

    #[test]
    fn test_displayed_fahrenheit_matches_formula() {
        // Every 16-bit reading in the rated range, and every 13-bit step
        for raw in MIN_TEMP_X128..=MAX_TEMP_X128 {
            for high_resolution in [true, false] {
                let celsius = if high_resolution {
                    raw as f64 / 128.0
                } else {
                    (raw >> 3) as f64 / 16.0
                };
                let expected = (celsius * 1.8 + 32.0).round_ties_even() as i16;
                let shown = celsius_x128_to_fahrenheit(raw_to_celsius_x128(raw, high_resolution));
                assert_eq!(shown, expected, "raw = {}, 16-bit = {}", raw, high_resolution);
            }
        }
    }

    #[test]
    fn test_probe() {
        let mut sensor = Adt7410::new(FakeBus::new(), DEFAULT_ADDRESS);
        assert_eq!(sensor.probe(), Ok(()));
    }

    #[test]
    fn test_probe_wrong_address() {
        let mut sensor = Adt7410::new(FakeBus::new(), 0x49);
        assert_eq!(sensor.probe(), Err(SensorError::NotFound));
    }

    #[test]
    fn test_probe_foreign_chip() {
        let mut bus = FakeBus::new();
        bus.regs[reg::ID as usize] = 0x75;
        let mut sensor = Adt7410::new(bus, DEFAULT_ADDRESS);
        assert_eq!(sensor.probe(), Err(SensorError::NotFound));
    }

    #[test]
    fn test_high_resolution_sets_config_bit() {
        let mut bus = FakeBus::new();
        bus.regs[reg::CONFIG as usize] = 0x03; // fault queue bits must survive
        let mut sensor = Adt7410::new(bus, DEFAULT_ADDRESS);
        assert!(!sensor.high_resolution());

        sensor.set_high_resolution(true).unwrap();
        assert!(sensor.high_resolution());
        let mut bus = sensor.i2c;
        assert_eq!(bus.regs[reg::CONFIG as usize], 0x83);

        bus.pointer = 0;
        let mut sensor = Adt7410::new(bus, DEFAULT_ADDRESS);
        sensor.set_high_resolution(false).unwrap();
        assert_eq!(sensor.i2c.regs[reg::CONFIG as usize], 0x03);
    }

    #[test]
    fn test_read_temperature() {
        let mut sensor = Adt7410::new(FakeBus::with_raw(2730), DEFAULT_ADDRESS);
        sensor.set_high_resolution(true).unwrap();
        assert_eq!(sensor.read_celsius_x128(), Ok(2730));
        // 21.33°C = 70.39°F
        assert_eq!(sensor.read_celsius_x128().map(celsius_x128_to_fahrenheit), Ok(70));
    }

    #[test]
    fn test_read_out_of_range() {
        // 200°C
        let mut sensor = Adt7410::new(FakeBus::with_raw(200 * 128), DEFAULT_ADDRESS);
        sensor.set_high_resolution(true).unwrap();
        assert_eq!(sensor.read_celsius_x128(), Err(SensorError::OutOfRange));
    }

    #[test]
    fn test_bus_error() {
        let mut sensor = Adt7410::new(FakeBus::new(), 0x4A);
        assert_eq!(sensor.read_celsius_x128(), Err(SensorError::Bus));
    }
}
