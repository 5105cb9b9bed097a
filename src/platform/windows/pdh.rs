use std::ptr;

use windows_sys::Win32::System::Performance::{
    PdhAddCounterW, PdhCloseQuery, PdhCollectQueryData, PdhGetFormattedCounterValue,
    PdhOpenQueryW, PDH_FMT_COUNTERVALUE, PDH_HCOUNTER, PDH_HQUERY,
};

use super::{check_status, to_wide, WindowsGateway};
use crate::core::status::{PDH_FMT_DOUBLE, PDH_INVALID_HANDLE};
use crate::platform::gateway::{
    CounterId, NativeFailure, NativeResult, PerfDataApi, Procedure, QueryId,
};

/// Per-value status meaning the sample is usable
const PDH_CSTATUS_VALID_DATA: u32 = 0x0000_0000;
const PDH_CSTATUS_NEW_DATA: u32 = 0x0000_0001;

impl PerfDataApi for WindowsGateway {
    fn open_query(&self) -> NativeResult<QueryId> {
        let mut query: PDH_HQUERY = unsafe { std::mem::zeroed() };
        let status = unsafe { PdhOpenQueryW(ptr::null(), 0, &mut query) };
        check_status(Procedure::PdhOpenQuery, status as u32)?;

        Ok(self.handles.lock().insert_query(query as usize))
    }

    fn add_counter(&self, query: QueryId, counter_path: &str) -> NativeResult<CounterId> {
        let raw_query = self
            .handles
            .lock()
            .query(query)
            .ok_or(NativeFailure::new(Procedure::PdhAddCounter, PDH_INVALID_HANDLE))?;

        let path = to_wide(counter_path);
        let mut counter: PDH_HCOUNTER = unsafe { std::mem::zeroed() };
        let status = unsafe {
            PdhAddCounterW(raw_query as PDH_HQUERY, path.as_ptr(), 0, &mut counter)
        };
        check_status(Procedure::PdhAddCounter, status as u32)?;

        self.handles
            .lock()
            .insert_counter(query, counter as usize)
            .ok_or(NativeFailure::new(Procedure::PdhAddCounter, PDH_INVALID_HANDLE))
    }

    fn collect_query_data(&self, query: QueryId) -> NativeResult<()> {
        let raw_query = self
            .handles
            .lock()
            .query(query)
            .ok_or(NativeFailure::new(
                Procedure::PdhCollectQueryData,
                PDH_INVALID_HANDLE,
            ))?;

        let status = unsafe { PdhCollectQueryData(raw_query as PDH_HQUERY) };
        check_status(Procedure::PdhCollectQueryData, status as u32)
    }

    fn formatted_double(&self, counter: CounterId) -> NativeResult<f64> {
        let raw_counter = self.handles.lock().counter(counter).ok_or(NativeFailure::new(
            Procedure::PdhGetFormattedCounterValue,
            PDH_INVALID_HANDLE,
        ))?;

        let mut value: PDH_FMT_COUNTERVALUE = unsafe { std::mem::zeroed() };
        let status = unsafe {
            PdhGetFormattedCounterValue(
                raw_counter as PDH_HCOUNTER,
                PDH_FMT_DOUBLE,
                ptr::null_mut(),
                &mut value,
            )
        };
        check_status(Procedure::PdhGetFormattedCounterValue, status as u32)?;

        let c_status = value.CStatus as u32;
        if c_status != PDH_CSTATUS_VALID_DATA && c_status != PDH_CSTATUS_NEW_DATA {
            return Err(NativeFailure::new(
                Procedure::PdhGetFormattedCounterValue,
                c_status,
            ));
        }

        Ok(unsafe { value.Anonymous.doubleValue })
    }

    fn close_query(&self, query: QueryId) -> NativeResult<()> {
        let raw_query = self
            .handles
            .lock()
            .remove_query(query)
            .ok_or(NativeFailure::new(Procedure::PdhCloseQuery, PDH_INVALID_HANDLE))?;

        let status = unsafe { PdhCloseQuery(raw_query as PDH_HQUERY) };
        check_status(Procedure::PdhCloseQuery, status as u32)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::counter::CounterSession;
    use crate::core::status::Reading;
    use crate::platform::windows::gateway;

    #[test]
    fn test_processor_time_lifecycle() {
        let gw = gateway();
        let mut session = CounterSession::start(gw).unwrap();
        let info = session
            .attach_counter("cpu", "\\Processor(_Total)\\% Processor Time")
            .unwrap();

        session.collect().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(200));
        session.collect().unwrap();

        match session.read_double(&info) {
            Reading::Ready(value) => assert!((0.0..=100.0).contains(&value)),
            Reading::Pending => {}
            other => panic!("unexpected reading: {:?}", other),
        }

        session.close().unwrap();
        assert_eq!(session.read_double(&info), Reading::Invalid);
    }

    #[test]
    fn test_bogus_counter_is_rejected() {
        let mut session = CounterSession::start(gateway()).unwrap();
        assert!(session
            .attach_counter("bogus", "\\No Such Object\\No Such Counter")
            .is_err());
    }
}
