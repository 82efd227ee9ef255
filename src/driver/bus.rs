// src/driver/bus.rs

use super::{sealed, AcquisitionMode, FrameSource};
use crate::common::{
    address::Dht12Addr,
    error::Dht12Error,
    frame::{RawFrame, FRAME_LEN},
    hal_traits::{Dht12Bus, Dht12Timer},
    timing,
};

/// Register holding the first byte of the measurement block.
pub const DATA_REGISTER: u8 = 0x00;

/// Register-based acquisition over an addressed bus.
pub struct BusReader<B> {
    bus: B,
    address: Dht12Addr,
}

impl<B: Dht12Bus> BusReader<B> {
    pub fn new(bus: B, address: Dht12Addr) -> Self {
        Self { bus, address }
    }

    #[inline]
    pub fn address(&self) -> Dht12Addr {
        self.address
    }

    /// Gives back the bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Points the sensor at the data register. A missing ACK is a connect error.
    fn select_data_register(&mut self) -> Result<(), Dht12Error<B::Error>> {
        self.bus.begin_transaction(self.address);
        self.bus.write_byte(DATA_REGISTER).map_err(|_| Dht12Error::Connect)?;
        self.bus.end_transaction().map_err(|_| {
            warn!("No acknowledge from {}", self.address.as_u8());
            Dht12Error::Connect
        })
    }

    fn read_block(&mut self) -> Result<RawFrame, Dht12Error<B::Error>> {
        let received = self
            .bus
            .request_bytes(self.address, FRAME_LEN)
            .map_err(|_| Dht12Error::Connect)?;
        trace!("Requested {} bytes, received {}", FRAME_LEN, received);

        let mut bytes = [0u8; FRAME_LEN];
        for byte in bytes.iter_mut() {
            *byte = self.bus.read_byte().map_err(|e| match e {
                nb::Error::WouldBlock => Dht12Error::Timeout,
                nb::Error::Other(e) => Dht12Error::Io(e),
            })?;
        }
        Ok(RawFrame::from_bytes(bytes))
    }
}

impl<B: Dht12Bus> sealed::Sealed for BusReader<B> {}

impl<B: Dht12Bus> FrameSource for BusReader<B> {
    type Error = B::Error;

    fn mode(&self) -> AcquisitionMode {
        AcquisitionMode::Bus { address: self.address }
    }

    fn prepare(&mut self) -> Result<(), Dht12Error<Self::Error>> {
        debug!("Bus mode, address {}", self.address.as_u8());
        Ok(())
    }

    fn read_frame<T: Dht12Timer>(&mut self, timer: &mut T) -> Result<RawFrame, Dht12Error<Self::Error>> {
        self.select_data_register()?;
        let frame = self.read_block()?;

        timer.delay_ms(timing::as_ms(timing::BUS_SETTLE));
        let leftover = self.bus.bytes_remaining();
        if leftover != 0 {
            warn!("{} unexpected bytes after frame", leftover);
            return Err(Dht12Error::Timeout);
        }

        frame.verify()
    }
}
