//! WASAPI mute control for the default capture endpoint.

use super::{AudioEndpoint, AudioError, MuteState};
use windows::Win32::Media::Audio::{
    eCapture, eConsole, Endpoints::IAudioEndpointVolume, IMMDeviceEnumerator, MMDeviceEnumerator,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED,
};

/// COM initialization guard that uninitializes COM on drop.
struct ComGuard;

impl ComGuard {
    fn new() -> Result<Self, AudioError> {
        unsafe {
            CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                .ok()
                .map_err(AudioError::ComInitFailed)?;
        }
        Ok(Self)
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        unsafe {
            CoUninitialize();
        }
    }
}

/// Adapter over the Windows default capture endpoint.
///
/// The endpoint volume interface is resolved fresh on every call, so
/// default-device changes (unplug, new default mic) are picked up
/// without any invalidation bookkeeping.
pub struct CaptureEndpoint;

impl CaptureEndpoint {
    pub fn new() -> Self {
        Self
    }

    fn endpoint_volume(&self) -> Result<(ComGuard, IAudioEndpointVolume), AudioError> {
        let guard = ComGuard::new()?;
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                    .map_err(AudioError::WindowsError)?;

            let device = enumerator
                .GetDefaultAudioEndpoint(eCapture, eConsole)
                .map_err(|_| AudioError::NoDefaultDevice)?;

            let volume: IAudioEndpointVolume = device
                .Activate(CLSCTX_ALL, None)
                .map_err(AudioError::VolumeNotAvailable)?;

            Ok((guard, volume))
        }
    }
}

impl Default for CaptureEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEndpoint for CaptureEndpoint {
    fn get_mute(&self) -> Result<MuteState, AudioError> {
        let (_com, volume) = self.endpoint_volume()?;
        let muted = unsafe { volume.GetMute() }.map_err(AudioError::WindowsError)?;
        Ok(MuteState::from_muted(muted.as_bool()))
    }

    fn set_mute(&self, state: MuteState) -> Result<(), AudioError> {
        let (_com, volume) = self.endpoint_volume()?;
        unsafe { volume.SetMute(state.is_muted(), std::ptr::null()) }
            .map_err(AudioError::WindowsError)?;
        Ok(())
    }
}
