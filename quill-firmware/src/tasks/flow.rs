//! Flow-control transmit task

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::FLOW_CHANNEL;

/// Writes one flow-control byte per started move to the host
#[embassy_executor::task]
pub async fn flow_task(mut tx: BufferedUartTx) {
    info!("Flow-control task started");

    loop {
        let token = FLOW_CHANNEL.receive().await;
        if let Err(e) = tx.write_all(&[token]).await {
            warn!("UART write error: {:?}", e);
        }
    }
}
