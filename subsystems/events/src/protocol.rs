//! # CLASS1.PROTOCOL Type Codes
//!
//! The protocol class types as a sum type. The core dispatches on this
//! instead of raw bytes; codes the framework does not know fold into
//! [`ProtocolType::Unknown`] and are ignored by the dispatcher.

/// CLASS1.PROTOCOL event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolType {
    /// Type 0, reserved general event.
    Undefined,
    /// Type 1, segment controller heartbeat.
    SegctrlHeartbeat,
    /// Type 2, new node online / nickname probe.
    NewNodeOnline,
    /// Type 3, probe acknowledge.
    ProbeAck,
    /// Type 6, set nickname for node.
    SetNickname,
    /// Type 7, nickname accepted.
    NicknameAccepted,
    /// Type 8, drop nickname / reset device.
    DropNickname,
    /// Type 9, read register.
    ReadRegister,
    /// Type 10, read/write response.
    RwResponse,
    /// Type 11, write register.
    WriteRegister,
    /// Type 12, enter boot loader mode.
    EnterBootLoader,
    /// Type 13, boot loader mode acknowledge.
    AckBootLoader,
    /// Type 14, boot loader mode refused.
    NackBootLoader,
    /// Type 15, start block data transfer.
    StartBlock,
    /// Type 16, block data.
    BlockData,
    /// Type 17, block data acknowledge.
    BlockDataAck,
    /// Type 18, block data refused.
    BlockDataNack,
    /// Type 19, program data block.
    ProgramBlockData,
    /// Type 20, program data block acknowledge.
    ProgramBlockDataAck,
    /// Type 21, program data block refused.
    ProgramBlockDataNack,
    /// Type 22, activate new image.
    ActivateNewImage,
    /// Type 23, GUID drop nickname / reset device.
    ResetDevice,
    /// Type 24, page read.
    PageRead,
    /// Type 25, page write.
    PageWrite,
    /// Type 26, read/write page response.
    RwPageResponse,
    /// Type 27, high end server probe.
    HighEndServerProbe,
    /// Type 28, high end server response.
    HighEndServerResponse,
    /// Type 29, increment register.
    IncrementRegister,
    /// Type 30, decrement register.
    DecrementRegister,
    /// Type 31, who is there?
    WhoIsThere,
    /// Type 32, who is there response.
    WhoIsThereResponse,
    /// Type 33, get decision matrix info.
    GetMatrixInfo,
    /// Type 34, get decision matrix info response.
    GetMatrixInfoResponse,
    /// Type 35, get embedded MDF.
    GetEmbeddedMdf,
    /// Type 36, get embedded MDF response.
    GetEmbeddedMdfResponse,
    /// Type 37, extended page read register.
    ExtendedPageRead,
    /// Type 38, extended page write register.
    ExtendedPageWrite,
    /// Type 39, extended page read/write response.
    ExtendedPageResponse,
    /// Type 40, get event interest.
    GetEventInterest,
    /// Type 41, get event interest response.
    GetEventInterestResponse,
    /// Type 48, activate new image acknowledge.
    ActivateNewImageAck,
    /// Type 49, activate new image refused.
    ActivateNewImageNack,
    /// Type 50, start block data transfer acknowledge.
    StartBlockAck,
    /// Type 51, start block data transfer refused.
    StartBlockNack,
    /// Any other (reserved or newer) type code.
    Unknown(u8),
}

impl From<u8> for ProtocolType {
    fn from(value: u8) -> Self {
        match value {
            0 => ProtocolType::Undefined,
            1 => ProtocolType::SegctrlHeartbeat,
            2 => ProtocolType::NewNodeOnline,
            3 => ProtocolType::ProbeAck,
            6 => ProtocolType::SetNickname,
            7 => ProtocolType::NicknameAccepted,
            8 => ProtocolType::DropNickname,
            9 => ProtocolType::ReadRegister,
            10 => ProtocolType::RwResponse,
            11 => ProtocolType::WriteRegister,
            12 => ProtocolType::EnterBootLoader,
            13 => ProtocolType::AckBootLoader,
            14 => ProtocolType::NackBootLoader,
            15 => ProtocolType::StartBlock,
            16 => ProtocolType::BlockData,
            17 => ProtocolType::BlockDataAck,
            18 => ProtocolType::BlockDataNack,
            19 => ProtocolType::ProgramBlockData,
            20 => ProtocolType::ProgramBlockDataAck,
            21 => ProtocolType::ProgramBlockDataNack,
            22 => ProtocolType::ActivateNewImage,
            23 => ProtocolType::ResetDevice,
            24 => ProtocolType::PageRead,
            25 => ProtocolType::PageWrite,
            26 => ProtocolType::RwPageResponse,
            27 => ProtocolType::HighEndServerProbe,
            28 => ProtocolType::HighEndServerResponse,
            29 => ProtocolType::IncrementRegister,
            30 => ProtocolType::DecrementRegister,
            31 => ProtocolType::WhoIsThere,
            32 => ProtocolType::WhoIsThereResponse,
            33 => ProtocolType::GetMatrixInfo,
            34 => ProtocolType::GetMatrixInfoResponse,
            35 => ProtocolType::GetEmbeddedMdf,
            36 => ProtocolType::GetEmbeddedMdfResponse,
            37 => ProtocolType::ExtendedPageRead,
            38 => ProtocolType::ExtendedPageWrite,
            39 => ProtocolType::ExtendedPageResponse,
            40 => ProtocolType::GetEventInterest,
            41 => ProtocolType::GetEventInterestResponse,
            48 => ProtocolType::ActivateNewImageAck,
            49 => ProtocolType::ActivateNewImageNack,
            50 => ProtocolType::StartBlockAck,
            51 => ProtocolType::StartBlockNack,
            other => ProtocolType::Unknown(other),
        }
    }
}

impl ProtocolType {
    /// The wire code of this type.
    pub const fn code(self) -> u8 {
        match self {
            ProtocolType::Undefined => 0,
            ProtocolType::SegctrlHeartbeat => 1,
            ProtocolType::NewNodeOnline => 2,
            ProtocolType::ProbeAck => 3,
            ProtocolType::SetNickname => 6,
            ProtocolType::NicknameAccepted => 7,
            ProtocolType::DropNickname => 8,
            ProtocolType::ReadRegister => 9,
            ProtocolType::RwResponse => 10,
            ProtocolType::WriteRegister => 11,
            ProtocolType::EnterBootLoader => 12,
            ProtocolType::AckBootLoader => 13,
            ProtocolType::NackBootLoader => 14,
            ProtocolType::StartBlock => 15,
            ProtocolType::BlockData => 16,
            ProtocolType::BlockDataAck => 17,
            ProtocolType::BlockDataNack => 18,
            ProtocolType::ProgramBlockData => 19,
            ProtocolType::ProgramBlockDataAck => 20,
            ProtocolType::ProgramBlockDataNack => 21,
            ProtocolType::ActivateNewImage => 22,
            ProtocolType::ResetDevice => 23,
            ProtocolType::PageRead => 24,
            ProtocolType::PageWrite => 25,
            ProtocolType::RwPageResponse => 26,
            ProtocolType::HighEndServerProbe => 27,
            ProtocolType::HighEndServerResponse => 28,
            ProtocolType::IncrementRegister => 29,
            ProtocolType::DecrementRegister => 30,
            ProtocolType::WhoIsThere => 31,
            ProtocolType::WhoIsThereResponse => 32,
            ProtocolType::GetMatrixInfo => 33,
            ProtocolType::GetMatrixInfoResponse => 34,
            ProtocolType::GetEmbeddedMdf => 35,
            ProtocolType::GetEmbeddedMdfResponse => 36,
            ProtocolType::ExtendedPageRead => 37,
            ProtocolType::ExtendedPageWrite => 38,
            ProtocolType::ExtendedPageResponse => 39,
            ProtocolType::GetEventInterest => 40,
            ProtocolType::GetEventInterestResponse => 41,
            ProtocolType::ActivateNewImageAck => 48,
            ProtocolType::ActivateNewImageNack => 49,
            ProtocolType::StartBlockAck => 50,
            ProtocolType::StartBlockNack => 51,
            ProtocolType::Unknown(code) => code,
        }
    }
}
